//! Port abstraction for review persistence.

use async_trait::async_trait;

use crate::domain::{LoadId, Review, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The `(load, reviewer)` pair already has a review (unique key).
        Duplicate { message: String } => "review already exists: {message}",
    }
}

/// Driven port for review storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review. Adapters surface a violated `(load, reviewer)`
    /// uniqueness constraint as [`ReviewPersistenceError::Duplicate`].
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// Fetch the review a user already left for a load, if any.
    async fn find_by_load_and_reviewer(
        &self,
        load_id: &LoadId,
        reviewer_id: &UserId,
    ) -> Result<Option<Review>, ReviewPersistenceError>;

    /// List every review naming the given user as the reviewed party.
    async fn list_for_reviewed(
        &self,
        reviewed_id: &UserId,
    ) -> Result<Vec<Review>, ReviewPersistenceError>;
}
