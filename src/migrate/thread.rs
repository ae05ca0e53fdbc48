//! Gathers the full conversation of one pull request from the source host.

use crate::github::error::MigrationError;
use crate::github::gateway::SourceGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::SourcePullRequest;

use super::conversation::PullRequest;
use super::translate::Translator;

/// Fetches and translates the three conversation collections of a pull
/// request.
pub struct ThreadReconstructor<'a, S: SourceGateway + ?Sized> {
    source: &'a S,
    translator: &'a Translator,
}

impl<'a, S: SourceGateway + ?Sized> ThreadReconstructor<'a, S> {
    /// Creates a reconstructor reading from `source`.
    #[must_use]
    pub const fn new(source: &'a S, translator: &'a Translator) -> Self {
        Self { source, translator }
    }

    /// Builds a [`PullRequest`] from its listing record.
    ///
    /// Reviewers and assignees come from the listing; comments, review
    /// comments, and reviews are fetched. Reviews without a body are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure; the caller skips the pull request.
    pub async fn reconstruct(
        &self,
        repository: &RepositoryLocator,
        listed: &SourcePullRequest,
    ) -> Result<PullRequest, MigrationError> {
        let number = listed.number;
        let (comments, review_comments, reviews) = tokio::try_join!(
            self.source.issue_comments(repository, number),
            self.source.review_comments(repository, number),
            self.source.reviews(repository, number),
        )?;

        Ok(PullRequest {
            number,
            shell: self.translator.pull_request(listed),
            assignees: listed.assignees.clone(),
            requested_reviewers: listed.requested_reviewers.clone(),
            comments: comments
                .iter()
                .map(|comment| self.translator.comment(comment))
                .collect(),
            reviews: reviews
                .iter()
                .filter_map(|review| self.translator.review(review))
                .collect(),
            review_comments: review_comments
                .iter()
                .map(|comment| self.translator.review_comment(comment))
                .collect(),
        })
    }
}
