//! PostgreSQL-backed `CancellationGateway` implementation using Diesel ORM.
//!
//! Cancellation pairs two writes that must never be split: the load leaves
//! `MATCHED` for `CANCELLED` and the shipper's balance is debited the fee.
//! Both run in one transaction with their preconditions re-checked by the
//! statements themselves; a failed guard aborts the transaction and
//! surfaces as the matching `SettlementError` variant.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::ports::{CancellationGateway, SettlementError};
use crate::domain::{LoadId, LoadStatus, UserId};

use super::pool::{DbPool, PoolError};
use super::schema::{loads, users};

/// Diesel-backed implementation of the `CancellationGateway` port.
#[derive(Clone)]
pub struct DieselCancellationGateway {
    pool: DbPool,
}

impl DieselCancellationGateway {
    /// Create a new gateway with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Transaction-internal error carrying the guard that failed.
///
/// Diesel rolls back on any `Err`, so guard failures travel through this
/// type to abort the transaction before being mapped to the port error.
#[derive(Debug)]
enum CancelTxError {
    Diesel(diesel::result::Error),
    StaleStatus,
    InsufficientFunds { balance: Decimal },
}

impl From<diesel::result::Error> for CancelTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

/// Map pool errors to settlement errors.
fn map_pool_error(error: PoolError) -> SettlementError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SettlementError::connection(message)
        }
    }
}

/// Map Diesel errors to settlement errors.
fn map_diesel_error(error: diesel::result::Error) -> SettlementError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => SettlementError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            SettlementError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => SettlementError::query("database error"),
        _ => SettlementError::query("database error"),
    }
}

#[async_trait]
impl CancellationGateway for DieselCancellationGateway {
    async fn cancel_with_fee(
        &self,
        load_id: &LoadId,
        shipper_id: &UserId,
        fee: Decimal,
    ) -> Result<Decimal, SettlementError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let load_uuid = *load_id.as_uuid();
        let shipper_uuid = *shipper_id.as_uuid();

        let result: Result<Decimal, CancelTxError> = conn
            .transaction(|conn| {
                async move {
                    let cancelled = diesel::update(
                        loads::table
                            .filter(loads::id.eq(load_uuid))
                            .filter(loads::status.eq(LoadStatus::Matched.as_str())),
                    )
                    .set(loads::status.eq(LoadStatus::Cancelled.as_str()))
                    .execute(conn)
                    .await?;

                    if cancelled == 0 {
                        return Err(CancelTxError::StaleStatus);
                    }

                    let new_balance: Option<Decimal> = diesel::update(
                        users::table
                            .filter(users::id.eq(shipper_uuid))
                            .filter(users::balance.ge(fee)),
                    )
                    .set(users::balance.eq(users::balance - fee))
                    .returning(users::balance)
                    .get_result(conn)
                    .await
                    .optional()?;

                    match new_balance {
                        Some(balance) => Ok(balance),
                        None => {
                            let balance: Decimal = users::table
                                .filter(users::id.eq(shipper_uuid))
                                .select(users::balance)
                                .first(conn)
                                .await?;
                            Err(CancelTxError::InsufficientFunds { balance })
                        }
                    }
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(balance) => Ok(balance),
            Err(CancelTxError::StaleStatus) => Err(SettlementError::stale_status()),
            Err(CancelTxError::InsufficientFunds { balance }) => {
                Err(SettlementError::insufficient_funds(balance))
            }
            Err(CancelTxError::Diesel(error)) => Err(map_diesel_error(error)),
        }
    }
}
