//! Driving port for the matching engine.

use async_trait::async_trait;

use crate::domain::{Error, Identity, LoadId, Match, MatchId, SwipeDirection, UserId};

/// Result of a directional swipe.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeOutcome {
    /// Whether this swipe produced a mutual match.
    pub matched: bool,
    /// The match record after the swipe was applied (unchanged when the
    /// pairing had already been decided).
    pub record: Match,
}

/// A shipper's answer to a pending match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    /// Accept the trucker; triggers the cascade onto the load.
    Accept,
    /// Decline the trucker, terminally.
    Reject,
}

/// Use-case surface converting swipes and responses into match state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchingEngine: Send + Sync {
    /// Record a person-to-person swipe; a mutual right-swipe promotes the
    /// pairing to `MATCHED`.
    async fn swipe(
        &self,
        actor: Identity,
        target_user_id: UserId,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome, Error>;

    /// Record a trucker's swipe on a load, creating or updating the match
    /// keyed by the `(load, trucker)` pair. Never touches the load's own
    /// status; promotion is the shipper's prerogative.
    async fn swipe_on_load(
        &self,
        actor: Identity,
        load_id: LoadId,
        direction: SwipeDirection,
    ) -> Result<Match, Error>;

    /// Apply the shipper's decision to a `PENDING` match. Accepting runs
    /// the atomic cascade: this match `MATCHED`, rival pending matches
    /// `REJECTED`, the load `MATCHED`.
    async fn respond_to_match(
        &self,
        actor: Identity,
        match_id: MatchId,
        decision: MatchDecision,
    ) -> Result<Match, Error>;

    /// List the matches visible to the caller: a trucker sees their
    /// `MATCHED` pairings, a shipper every match on their loads, an admin
    /// everything.
    async fn matches_for(&self, actor: Identity) -> Result<Vec<Match>, Error>;
}
