//! Driving port for the load lifecycle controller.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Error, Identity, Load, LoadDraft, LoadId};

/// Outcome of a successful cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct CancellationReceipt {
    /// The load, now `CANCELLED`.
    pub load: Load,
    /// The shipper's balance after the fee was debited.
    pub new_balance: Decimal,
}

/// Use-case surface owning every load status transition beyond matching.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoadLifecycle: Send + Sync {
    /// Validate and post a new `PENDING` load for the calling shipper.
    async fn create_load(&self, actor: Identity, draft: LoadDraft) -> Result<Load, Error>;

    /// List the loads the calling shipper owns.
    async fn loads_for_shipper(&self, actor: Identity) -> Result<Vec<Load>, Error>;

    /// List `PENDING` loads the calling trucker has not swiped on yet.
    async fn available_loads(&self, actor: Identity) -> Result<Vec<Load>, Error>;

    /// Record the caller's transit confirmation on a `MATCHED` load.
    /// When the second party confirms, the same update advances the load
    /// to `IN_TRANSIT`; until then the partially confirmed load comes
    /// back unchanged in status, which is the expected waiting outcome.
    async fn request_transit(&self, actor: Identity, load_id: LoadId) -> Result<Load, Error>;

    /// Close out an `IN_TRANSIT` load; owning shipper only.
    async fn complete_load(&self, actor: Identity, load_id: LoadId) -> Result<Load, Error>;

    /// Cancel a `MATCHED` load, debiting the fixed cancellation fee from
    /// the shipper in the same atomic step.
    async fn cancel_load(
        &self,
        actor: Identity,
        load_id: LoadId,
    ) -> Result<CancellationReceipt, Error>;

    /// Remove a `PENDING` load; owning shipper only. Matched loads must
    /// be cancelled instead so the fee applies and history survives.
    async fn delete_load(&self, actor: Identity, load_id: LoadId) -> Result<(), Error>;
}
