//! Driving port for the review ledger.
//!
//! Thin by design: the ledger only consumes the lifecycle's "is this load
//! COMPLETED, and who are its two parties" predicate and enforces
//! one-review-per-reviewer-per-load.

use async_trait::async_trait;

use crate::domain::{Error, Identity, LoadId, Rating, Review, UserId};

/// Reviews about one user plus their average rating.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSummary {
    /// Reviews naming the user as the reviewed party.
    pub reviews: Vec<Review>,
    /// Mean rating, absent when there are no reviews.
    pub average_rating: Option<f64>,
}

/// Use-case surface for post-completion rating capture.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewLedger: Send + Sync {
    /// Record the caller's review of their counterparty on a `COMPLETED`
    /// load.
    async fn submit_review(
        &self,
        actor: Identity,
        load_id: LoadId,
        rating: Rating,
        comment: String,
    ) -> Result<Review, Error>;

    /// Fetch the reviews about a user and their average rating.
    async fn reviews_for(&self, user_id: &UserId) -> Result<ReviewSummary, Error>;
}
