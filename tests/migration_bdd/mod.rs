//! Support modules for the migration BDD tests.

pub(crate) mod harness;
#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use harness::{
    FakeMirror, REPOSITORY, conversation_posts, mount_source, mount_target_probe,
    mount_target_writes, received_paths,
};
pub(crate) use state::{MigrationState, ensure_hosts, run_migration};
