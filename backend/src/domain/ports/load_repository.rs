//! Port abstraction for load persistence.
//!
//! Mutating methods implement the optimistic-with-transactional-guards
//! model: each one re-validates its status precondition inside the same
//! atomic write and reports a failed guard as `Ok(None)` (or `Ok(false)`
//! for deletion) so the service can surface a conflict without the
//! adapter knowing domain error codes.

use async_trait::async_trait;

use crate::domain::{Load, LoadId, Role, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by load repository adapters.
    pub enum LoadPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "load repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "load repository query failed: {message}",
    }
}

/// Driven port for load storage and guarded status transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoadRepository: Send + Sync {
    /// Insert a newly drafted load.
    async fn insert(&self, load: &Load) -> Result<(), LoadPersistenceError>;

    /// Fetch a load by identifier.
    async fn find_by_id(&self, id: &LoadId) -> Result<Option<Load>, LoadPersistenceError>;

    /// List the loads a shipper owns.
    async fn list_by_shipper(
        &self,
        shipper_id: &UserId,
    ) -> Result<Vec<Load>, LoadPersistenceError>;

    /// List `PENDING` loads the given trucker has not swiped on yet.
    async fn list_available_for_trucker(
        &self,
        trucker_id: &UserId,
    ) -> Result<Vec<Load>, LoadPersistenceError>;

    /// Record the given party's transit confirmation and, when both flags
    /// are set after the write, advance the load to `IN_TRANSIT` in the
    /// same atomic step.
    ///
    /// Guard: the load must still be `MATCHED`. Returns the updated load,
    /// or `None` when the guard failed at write time.
    async fn confirm_transit(
        &self,
        id: &LoadId,
        party: Role,
    ) -> Result<Option<Load>, LoadPersistenceError>;

    /// Advance an `IN_TRANSIT` load to `COMPLETED`.
    ///
    /// Returns the updated load, or `None` when the load was no longer
    /// `IN_TRANSIT` at write time.
    async fn complete(&self, id: &LoadId) -> Result<Option<Load>, LoadPersistenceError>;

    /// Remove a load that is still `PENDING`.
    ///
    /// Returns `false` when the load had already left `PENDING` (or was
    /// already gone) at write time.
    async fn delete_pending(&self, id: &LoadId) -> Result<bool, LoadPersistenceError>;
}
