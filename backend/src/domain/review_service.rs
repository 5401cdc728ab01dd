//! Review ledger: post-completion rating capture.
//!
//! Consumes the lifecycle's completed-load predicate, derives the
//! reviewed counterparty from the reviewer's role, and enforces one
//! review per reviewer per load.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    LoadRepository, MatchRepository, ReviewLedger, ReviewRepository, ReviewSummary,
};
use crate::domain::{Error, Identity, LoadId, LoadStatus, Rating, Review, Role, UserId};

use super::port_error_mapping::{map_load_error, map_match_error, map_review_error};

/// Review ledger over load, match, and review repositories.
#[derive(Clone)]
pub struct ReviewService<L, M, R> {
    loads: Arc<L>,
    matches: Arc<M>,
    reviews: Arc<R>,
}

impl<L, M, R> ReviewService<L, M, R> {
    /// Create a new ledger with the given repositories.
    pub fn new(loads: Arc<L>, matches: Arc<M>, reviews: Arc<R>) -> Self {
        Self {
            loads,
            matches,
            reviews,
        }
    }
}

impl<L, M, R> ReviewService<L, M, R>
where
    L: LoadRepository,
    M: MatchRepository,
    R: ReviewRepository,
{
    /// Determine who the actor is reviewing: a shipper reviews the load's
    /// matched trucker, the matched trucker reviews the shipper.
    async fn reviewed_party(
        &self,
        actor: Identity,
        load: &crate::domain::Load,
    ) -> Result<UserId, Error> {
        match actor.role {
            Role::Shipper => {
                if load.shipper_id != actor.user_id {
                    return Err(Error::forbidden("you do not own this load"));
                }
                let matched = self
                    .matches
                    .find_matched_for_load(&load.id)
                    .await
                    .map_err(map_match_error)?
                    .ok_or_else(|| {
                        Error::invalid_state("no matched trucker found for this load")
                    })?;
                Ok(matched.trucker_id)
            }
            Role::Trucker => {
                let matched = self
                    .matches
                    .find_matched_for_load(&load.id)
                    .await
                    .map_err(map_match_error)?;
                if matched.is_some_and(|m| m.trucker_id == actor.user_id) {
                    Ok(load.shipper_id)
                } else {
                    Err(Error::forbidden(
                        "only the matched trucker can review this load",
                    ))
                }
            }
            Role::Admin => Err(Error::forbidden(
                "only shippers and truckers can leave reviews",
            )),
        }
    }
}

#[async_trait]
impl<L, M, R> ReviewLedger for ReviewService<L, M, R>
where
    L: LoadRepository,
    M: MatchRepository,
    R: ReviewRepository,
{
    async fn submit_review(
        &self,
        actor: Identity,
        load_id: LoadId,
        rating: Rating,
        comment: String,
    ) -> Result<Review, Error> {
        let load = self
            .loads
            .find_by_id(&load_id)
            .await
            .map_err(map_load_error)?
            .ok_or_else(|| Error::not_found("load not found"))?;

        if load.status != LoadStatus::Completed {
            return Err(Error::invalid_state("only completed loads can be reviewed"));
        }

        let reviewed_id = self.reviewed_party(actor, &load).await?;

        let existing = self
            .reviews
            .find_by_load_and_reviewer(&load_id, &actor.user_id)
            .await
            .map_err(map_review_error)?;
        if existing.is_some() {
            return Err(Error::conflict("you have already reviewed this load"));
        }

        let review = Review::new(load_id, actor.user_id, reviewed_id, rating, comment);
        // The unique (load, reviewer) key closes the check-then-insert
        // race; a concurrent duplicate surfaces as Conflict here.
        self.reviews
            .insert(&review)
            .await
            .map_err(map_review_error)?;
        Ok(review)
    }

    async fn reviews_for(&self, user_id: &UserId) -> Result<ReviewSummary, Error> {
        let reviews = self
            .reviews
            .list_for_reviewed(user_id)
            .await
            .map_err(map_review_error)?;

        let average_rating = if reviews.is_empty() {
            None
        } else {
            let total: i64 = reviews.iter().map(|r| i64::from(r.rating.value())).sum();
            Some(total as f64 / reviews.len() as f64)
        };

        Ok(ReviewSummary {
            reviews,
            average_rating,
        })
    }
}
