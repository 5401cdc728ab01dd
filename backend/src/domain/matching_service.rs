//! Matching engine: resolves directional swipes into match state and
//! decides reciprocity.
//!
//! Tie-break policy: the first mutual right-swipe wins. Once a load is
//! `MATCHED` no further match on it can be promoted; the accept cascade
//! re-validates that inside the repository's atomic step, so two
//! concurrent shipper responses cannot both succeed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    LoadRepository, MatchDecision, MatchRepository, MatchingEngine, SwipeOutcome,
};
use crate::domain::{
    Error, Identity, LoadId, Match, MatchId, MatchStatus, Role, SwipeDirection, UserId,
};

use super::port_error_mapping::{map_load_error, map_match_error};

/// Matching engine over match and load repositories.
#[derive(Clone)]
pub struct MatchingService<M, L> {
    matches: Arc<M>,
    loads: Arc<L>,
}

impl<M, L> MatchingService<M, L> {
    /// Create a new engine with the given repositories.
    pub fn new(matches: Arc<M>, loads: Arc<L>) -> Self {
        Self { matches, loads }
    }
}

impl<M, L> MatchingService<M, L>
where
    M: MatchRepository,
    L: LoadRepository,
{
    /// Resolve which side of the pairing the actor occupies.
    fn pairing_sides(actor: Identity, target: UserId) -> Result<(UserId, UserId), Error> {
        match actor.role {
            Role::Trucker => Ok((actor.user_id, target)),
            Role::Shipper => Ok((target, actor.user_id)),
            Role::Admin => Err(Error::forbidden("only shippers and truckers can swipe")),
        }
    }
}

#[async_trait]
impl<M, L> MatchingEngine for MatchingService<M, L>
where
    M: MatchRepository,
    L: LoadRepository,
{
    async fn swipe(
        &self,
        actor: Identity,
        target_user_id: UserId,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome, Error> {
        if actor.user_id == target_user_id {
            return Err(Error::invalid_request("you cannot swipe on yourself"));
        }
        let (trucker_id, shipper_id) = Self::pairing_sides(actor, target_user_id)?;

        let existing = self
            .matches
            .find_between(&trucker_id, &shipper_id)
            .await
            .map_err(map_match_error)?;

        let Some(existing) = existing else {
            let record = Match::between(trucker_id, shipper_id, direction);
            self.matches
                .insert(&record)
                .await
                .map_err(map_match_error)?;
            return Ok(SwipeOutcome {
                matched: false,
                record,
            });
        };

        // Mutual acceptance: a right-swipe on a still-pending pairing.
        if existing.status == MatchStatus::Pending && direction == SwipeDirection::Right {
            let promoted = self
                .matches
                .promote_if_pending(&existing.id)
                .await
                .map_err(map_match_error)?
                .ok_or_else(|| Error::conflict("match was decided concurrently"))?;
            return Ok(SwipeOutcome {
                matched: true,
                record: promoted,
            });
        }

        // Already decided; report without changing anything.
        Ok(SwipeOutcome {
            matched: false,
            record: existing,
        })
    }

    async fn swipe_on_load(
        &self,
        actor: Identity,
        load_id: LoadId,
        direction: SwipeDirection,
    ) -> Result<Match, Error> {
        if actor.role != Role::Trucker {
            return Err(Error::forbidden("only truckers can swipe on loads"));
        }

        let load = self
            .loads
            .find_by_id(&load_id)
            .await
            .map_err(map_load_error)?
            .ok_or_else(|| Error::not_found("load not found"))?;

        let existing = self
            .matches
            .find_by_load_and_trucker(&load_id, &actor.user_id)
            .await
            .map_err(map_match_error)?;

        let Some(existing) = existing else {
            let record = Match::for_load(load_id, actor.user_id, load.shipper_id, direction);
            self.matches
                .insert(&record)
                .await
                .map_err(map_match_error)?;
            return Ok(record);
        };

        if !existing.open_to_trucker() {
            return Err(Error::invalid_state("match has already been decided"));
        }

        self.matches
            .update_trucker_swipe(&existing.id, direction.initial_status())
            .await
            .map_err(map_match_error)?
            .ok_or_else(|| Error::conflict("match was decided concurrently"))
    }

    async fn respond_to_match(
        &self,
        actor: Identity,
        match_id: MatchId,
        decision: MatchDecision,
    ) -> Result<Match, Error> {
        if actor.role != Role::Shipper {
            return Err(Error::forbidden("only shippers can respond to matches"));
        }

        let record = self
            .matches
            .find_by_id(&match_id)
            .await
            .map_err(map_match_error)?
            .ok_or_else(|| Error::not_found("match not found"))?;

        if record.shipper_id != actor.user_id {
            return Err(Error::forbidden("you do not own this match"));
        }
        if record.status != MatchStatus::Pending {
            return Err(Error::invalid_state(
                "only pending matches can be responded to",
            ));
        }

        let updated = match decision {
            MatchDecision::Reject => {
                self.matches
                    .reject_as_shipper(&match_id)
                    .await
                    .map_err(map_match_error)?
            }
            MatchDecision::Accept => match record.load_id {
                Some(load_id) => self
                    .matches
                    .accept(&match_id, &load_id)
                    .await
                    .map_err(map_match_error)?,
                // Person-to-person matches have no load to cascade onto.
                None => self
                    .matches
                    .promote_if_pending(&match_id)
                    .await
                    .map_err(map_match_error)?,
            },
        };

        updated.ok_or_else(|| Error::conflict("match or load changed concurrently"))
    }

    async fn matches_for(&self, actor: Identity) -> Result<Vec<Match>, Error> {
        let result = match actor.role {
            Role::Trucker => self.matches.list_matched_for_trucker(&actor.user_id).await,
            Role::Shipper => self.matches.list_for_shipper(&actor.user_id).await,
            Role::Admin => self.matches.list_all().await,
        };
        result.map_err(map_match_error)
    }
}
