//! Port abstraction for match persistence.
//!
//! The guarded mutators follow the same convention as the load port:
//! preconditions are re-checked inside the atomic write and a failed guard
//! comes back as `Ok(None)`, leaving conflict reporting to the service.

use async_trait::async_trait;

use crate::domain::{LoadId, Match, MatchId, MatchStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by match repository adapters.
    pub enum MatchPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "match repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "match repository query failed: {message}",
    }
}

/// Driven port for match storage, swipe updates, and the accept cascade.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Insert a newly created match.
    async fn insert(&self, record: &Match) -> Result<(), MatchPersistenceError>;

    /// Fetch a match by identifier.
    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, MatchPersistenceError>;

    /// Fetch the match keyed by the `(load, trucker)` natural key.
    async fn find_by_load_and_trucker(
        &self,
        load_id: &LoadId,
        trucker_id: &UserId,
    ) -> Result<Option<Match>, MatchPersistenceError>;

    /// Fetch the person-to-person match between a trucker and a shipper.
    async fn find_between(
        &self,
        trucker_id: &UserId,
        shipper_id: &UserId,
    ) -> Result<Option<Match>, MatchPersistenceError>;

    /// Fetch the single `MATCHED` match on a load, if any.
    async fn find_matched_for_load(
        &self,
        load_id: &LoadId,
    ) -> Result<Option<Match>, MatchPersistenceError>;

    /// Overwrite the status of a match the trucker may still change.
    ///
    /// Guard: the match must not be `MATCHED` and the shipper must not
    /// have responded. Returns the updated match, or `None` when the
    /// guard failed at write time.
    async fn update_trucker_swipe(
        &self,
        id: &MatchId,
        status: MatchStatus,
    ) -> Result<Option<Match>, MatchPersistenceError>;

    /// Promote a still-`PENDING` match to `MATCHED` (mutual swipe path,
    /// no load involved).
    ///
    /// Returns the updated match, or `None` when the match had already
    /// been decided at write time.
    async fn promote_if_pending(
        &self,
        id: &MatchId,
    ) -> Result<Option<Match>, MatchPersistenceError>;

    /// Accept one `PENDING` match on a load: atomically promote it to
    /// `MATCHED`, force every other `PENDING` match on the load to
    /// `REJECTED`, and set the load itself to `MATCHED`.
    ///
    /// Guards: the match must still be `PENDING` and the load must still
    /// be un-matched; either failing rolls the whole step back and
    /// returns `None`.
    async fn accept(
        &self,
        id: &MatchId,
        load_id: &LoadId,
    ) -> Result<Option<Match>, MatchPersistenceError>;

    /// Record the shipper's rejection of a still-`PENDING` match. This is
    /// terminal: the trucker cannot revive it.
    ///
    /// Returns the updated match, or `None` when the match had already
    /// been decided at write time.
    async fn reject_as_shipper(
        &self,
        id: &MatchId,
    ) -> Result<Option<Match>, MatchPersistenceError>;

    /// List a trucker's `MATCHED` matches.
    async fn list_matched_for_trucker(
        &self,
        trucker_id: &UserId,
    ) -> Result<Vec<Match>, MatchPersistenceError>;

    /// List every match on a shipper's loads, whatever its status.
    async fn list_for_shipper(
        &self,
        shipper_id: &UserId,
    ) -> Result<Vec<Match>, MatchPersistenceError>;

    /// List every match in the system (admin view).
    async fn list_all(&self) -> Result<Vec<Match>, MatchPersistenceError>;
}
