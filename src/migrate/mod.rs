//! Organization migration pipeline.
//!
//! The [`Migrator`] resolves the target organization, syncs membership and
//! teams, then mirrors each repository and reconstructs its pull request
//! history. Pull requests are rebuilt by the [`ThreadReconstructor`],
//! rewritten by the [`Translator`], and replayed by the [`ReplayEngine`].
//! Every per-entity result is collected into a [`MigrationReport`].

pub mod context;
pub mod conversation;
pub mod membership;
pub mod orchestrator;
pub mod replay;
pub mod report;
pub mod teams;
pub mod thread;
pub mod translate;

pub use context::{MigrationContext, ReplayMode};
pub use conversation::{ConversationEntry, EntryKind, PullRequest, ReplayEndpoint};
pub use membership::{MembershipOutcome, Roster};
pub use orchestrator::Migrator;
pub use replay::{ReplayEngine, ReplayOutcome, ReplayStep};
pub use report::{
    MigrationReport, RepositoryOutcome, RepositoryStatus, RepositoryStep, RunStage, StageFailure,
};
pub use teams::TeamOutcome;
pub use thread::ThreadReconstructor;
pub use translate::{TeamRoster, Translator};
