//! Port abstraction for the cancellation settlement transaction.
//!
//! Cancellation is the one transition whose side effect spans two
//! entities: the shipper's balance and the load's status. This port owns
//! that pairing so no caller can ever apply half of it.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{LoadId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by settlement gateway adapters.
    pub enum SettlementError {
        /// Gateway connection could not be established.
        Connection { message: String } => "settlement gateway connection failed: {message}",
        /// Transaction failed during execution.
        Query { message: String } => "settlement transaction failed: {message}",
        /// The balance no longer covered the fee at commit time.
        InsufficientFunds { balance: Decimal } => "balance {balance} cannot cover the cancellation fee",
        /// The load had already left the cancellable state at commit time.
        StaleStatus => "load is no longer in a cancellable state",
    }
}

/// Driven port executing cancellation as one atomic transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CancellationGateway: Send + Sync {
    /// Debit `fee` from the shipper and set the load to `CANCELLED`, both
    /// inside one transaction with the preconditions re-validated at
    /// write time (load still `MATCHED`, balance still covers the fee).
    ///
    /// Returns the post-decrement balance. Either both writes commit or
    /// neither does.
    async fn cancel_with_fee(
        &self,
        load_id: &LoadId,
        shipper_id: &UserId,
        fee: Decimal,
    ) -> Result<Decimal, SettlementError>;
}
