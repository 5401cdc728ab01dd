//! PostgreSQL-backed `LoadRepository` implementation using Diesel ORM.
//!
//! Every status transition here is a guarded `UPDATE`: the precondition is
//! part of the statement's `WHERE` clause, so a load that moved on between
//! the service's read and this write simply matches zero rows and the
//! adapter reports `None` without ever committing a bad transition.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{LoadPersistenceError, LoadRepository};
use crate::domain::{Address, Load, LoadId, LoadStatus, Role, UserId};

use super::models::{LoadRow, NewLoadRow};
use super::pool::{DbPool, PoolError};
use super::schema::{loads, matches};

/// Diesel-backed implementation of the `LoadRepository` port.
#[derive(Clone)]
pub struct DieselLoadRepository {
    pool: DbPool,
}

impl DieselLoadRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain load persistence errors.
fn map_pool_error(error: PoolError) -> LoadPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            LoadPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain load persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> LoadPersistenceError {
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
        DieselError::NotFound => LoadPersistenceError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            LoadPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => LoadPersistenceError::query("database error"),
        _ => LoadPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain load.
fn row_to_load(row: LoadRow) -> Result<Load, LoadPersistenceError> {
    let status: LoadStatus = row
        .status
        .parse()
        .map_err(|_| LoadPersistenceError::query(format!("unrecognised status: {}", row.status)))?;
    let origin = Address::new(row.origin)
        .map_err(|error| LoadPersistenceError::query(format!("invalid origin: {error}")))?;
    let destination = Address::new(row.destination)
        .map_err(|error| LoadPersistenceError::query(format!("invalid destination: {error}")))?;

    Ok(Load {
        id: LoadId::from_uuid(row.id),
        shipper_id: UserId::from_uuid(row.shipper_id),
        origin,
        destination,
        weight: row.weight,
        budget: row.budget,
        deadline: row.deadline,
        description: row.description,
        status,
        shipper_in_transit_confirmed: row.shipper_in_transit_confirmed,
        trucker_in_transit_confirmed: row.trucker_in_transit_confirmed,
    })
}

#[async_trait]
impl LoadRepository for DieselLoadRepository {
    async fn insert(&self, load: &Load) -> Result<(), LoadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewLoadRow {
            id: *load.id.as_uuid(),
            shipper_id: *load.shipper_id.as_uuid(),
            origin: load.origin.as_str(),
            destination: load.destination.as_str(),
            weight: load.weight,
            budget: load.budget,
            deadline: load.deadline,
            description: &load.description,
            status: load.status.as_str(),
            shipper_in_transit_confirmed: load.shipper_in_transit_confirmed,
            trucker_in_transit_confirmed: load.trucker_in_transit_confirmed,
        };

        diesel::insert_into(loads::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &LoadId) -> Result<Option<Load>, LoadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LoadRow> = loads::table
            .filter(loads::id.eq(id.as_uuid()))
            .select(LoadRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_load).transpose()
    }

    async fn list_by_shipper(
        &self,
        shipper_id: &UserId,
    ) -> Result<Vec<Load>, LoadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LoadRow> = loads::table
            .filter(loads::shipper_id.eq(shipper_id.as_uuid()))
            .order(loads::created_at.desc())
            .select(LoadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_load).collect()
    }

    async fn list_available_for_trucker(
        &self,
        trucker_id: &UserId,
    ) -> Result<Vec<Load>, LoadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Loads the trucker already swiped on have a match row keyed by
        // (load_id, trucker_id); exclude them from the deck.
        let swiped_loads = matches::table
            .filter(matches::trucker_id.eq(trucker_id.as_uuid()))
            .filter(matches::load_id.is_not_null())
            .select(matches::load_id.assume_not_null());

        let rows: Vec<LoadRow> = loads::table
            .filter(loads::status.eq(LoadStatus::Pending.as_str()))
            .filter(loads::id.ne_all(swiped_loads))
            .order(loads::created_at.desc())
            .select(LoadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_load).collect()
    }

    async fn confirm_transit(
        &self,
        id: &LoadId,
        party: Role,
    ) -> Result<Option<Load>, LoadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let load_uuid = *id.as_uuid();

        let row = conn
            .transaction(|conn| {
                async move {
                    let guard = loads::table
                        .filter(loads::id.eq(load_uuid))
                        .filter(loads::status.eq(LoadStatus::Matched.as_str()));

                    let flagged: Option<LoadRow> = match party {
                        Role::Shipper => {
                            diesel::update(guard)
                                .set(loads::shipper_in_transit_confirmed.eq(true))
                                .returning(LoadRow::as_returning())
                                .get_result(conn)
                                .await
                                .optional()?
                        }
                        Role::Trucker => {
                            diesel::update(guard)
                                .set(loads::trucker_in_transit_confirmed.eq(true))
                                .returning(LoadRow::as_returning())
                                .get_result(conn)
                                .await
                                .optional()?
                        }
                        Role::Admin => None,
                    };

                    // No flag written means the MATCHED guard failed; the
                    // transaction has nothing to roll back.
                    let Some(flagged) = flagged else {
                        return Ok(None);
                    };

                    if flagged.shipper_in_transit_confirmed
                        && flagged.trucker_in_transit_confirmed
                    {
                        let promoted: LoadRow = diesel::update(
                            loads::table
                                .filter(loads::id.eq(load_uuid))
                                .filter(loads::status.eq(LoadStatus::Matched.as_str())),
                        )
                        .set(loads::status.eq(LoadStatus::InTransit.as_str()))
                        .returning(LoadRow::as_returning())
                        .get_result(conn)
                        .await?;
                        return Ok(Some(promoted));
                    }

                    Ok(Some(flagged))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_load).transpose()
    }

    async fn complete(&self, id: &LoadId) -> Result<Option<Load>, LoadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LoadRow> = diesel::update(
            loads::table
                .filter(loads::id.eq(id.as_uuid()))
                .filter(loads::status.eq(LoadStatus::InTransit.as_str())),
        )
        .set(loads::status.eq(LoadStatus::Completed.as_str()))
        .returning(LoadRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_load).transpose()
    }

    async fn delete_pending(&self, id: &LoadId) -> Result<bool, LoadPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            loads::table
                .filter(loads::id.eq(id.as_uuid()))
                .filter(loads::status.eq(LoadStatus::Pending.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
