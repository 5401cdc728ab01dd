//! PostgreSQL-backed `MatchRepository` implementation using Diesel ORM.
//!
//! The accept cascade is the one multi-row write in this adapter: the
//! chosen match, its rivals, and the load itself all move in a single
//! transaction, with both status guards re-checked inside it. A failed
//! guard aborts via `RollbackTransaction`, which the adapter reports to
//! the service as `Ok(None)`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{MatchPersistenceError, MatchRepository};
use crate::domain::{LoadId, LoadStatus, Match, MatchId, MatchStatus, UserId};

use super::models::{MatchRow, NewMatchRow};
use super::pool::{DbPool, PoolError};
use super::schema::{loads, matches};

/// Diesel-backed implementation of the `MatchRepository` port.
#[derive(Clone)]
pub struct DieselMatchRepository {
    pool: DbPool,
}

impl DieselMatchRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain match persistence errors.
fn map_pool_error(error: PoolError) -> MatchPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            MatchPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain match persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> MatchPersistenceError {
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
        DieselError::NotFound => MatchPersistenceError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            MatchPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => MatchPersistenceError::query("database error"),
        _ => MatchPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain match.
fn row_to_match(row: MatchRow) -> Result<Match, MatchPersistenceError> {
    let status: MatchStatus = row.status.parse().map_err(|_| {
        MatchPersistenceError::query(format!("unrecognised status: {}", row.status))
    })?;

    Ok(Match {
        id: MatchId::from_uuid(row.id),
        load_id: row.load_id.map(LoadId::from_uuid),
        trucker_id: UserId::from_uuid(row.trucker_id),
        shipper_id: UserId::from_uuid(row.shipper_id),
        status,
        shipper_responded: row.shipper_responded,
    })
}

#[async_trait]
impl MatchRepository for DieselMatchRepository {
    async fn insert(&self, record: &Match) -> Result<(), MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewMatchRow {
            id: *record.id.as_uuid(),
            load_id: record.load_id.map(|id| *id.as_uuid()),
            trucker_id: *record.trucker_id.as_uuid(),
            shipper_id: *record.shipper_id.as_uuid(),
            status: record.status.as_str(),
            shipper_responded: record.shipper_responded,
        };

        diesel::insert_into(matches::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MatchRow> = matches::table
            .filter(matches::id.eq(id.as_uuid()))
            .select(MatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_match).transpose()
    }

    async fn find_by_load_and_trucker(
        &self,
        load_id: &LoadId,
        trucker_id: &UserId,
    ) -> Result<Option<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MatchRow> = matches::table
            .filter(matches::load_id.eq(load_id.as_uuid()))
            .filter(matches::trucker_id.eq(trucker_id.as_uuid()))
            .select(MatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_match).transpose()
    }

    async fn find_between(
        &self,
        trucker_id: &UserId,
        shipper_id: &UserId,
    ) -> Result<Option<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MatchRow> = matches::table
            .filter(matches::load_id.is_null())
            .filter(matches::trucker_id.eq(trucker_id.as_uuid()))
            .filter(matches::shipper_id.eq(shipper_id.as_uuid()))
            .select(MatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_match).transpose()
    }

    async fn find_matched_for_load(
        &self,
        load_id: &LoadId,
    ) -> Result<Option<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MatchRow> = matches::table
            .filter(matches::load_id.eq(load_id.as_uuid()))
            .filter(matches::status.eq(MatchStatus::Matched.as_str()))
            .select(MatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_match).transpose()
    }

    async fn update_trucker_swipe(
        &self,
        id: &MatchId,
        status: MatchStatus,
    ) -> Result<Option<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MatchRow> = diesel::update(
            matches::table
                .filter(matches::id.eq(id.as_uuid()))
                .filter(matches::status.ne(MatchStatus::Matched.as_str()))
                .filter(matches::shipper_responded.eq(false)),
        )
        .set(matches::status.eq(status.as_str()))
        .returning(MatchRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_match).transpose()
    }

    async fn promote_if_pending(
        &self,
        id: &MatchId,
    ) -> Result<Option<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MatchRow> = diesel::update(
            matches::table
                .filter(matches::id.eq(id.as_uuid()))
                .filter(matches::status.eq(MatchStatus::Pending.as_str())),
        )
        .set(matches::status.eq(MatchStatus::Matched.as_str()))
        .returning(MatchRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_match).transpose()
    }

    async fn accept(
        &self,
        id: &MatchId,
        load_id: &LoadId,
    ) -> Result<Option<Match>, MatchPersistenceError> {
        use diesel::result::Error as DieselError;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let match_uuid = *id.as_uuid();
        let load_uuid = *load_id.as_uuid();

        let result = conn
            .transaction(|conn| {
                async move {
                    let accepted: Option<MatchRow> = diesel::update(
                        matches::table
                            .filter(matches::id.eq(match_uuid))
                            .filter(matches::status.eq(MatchStatus::Pending.as_str())),
                    )
                    .set((
                        matches::status.eq(MatchStatus::Matched.as_str()),
                        matches::shipper_responded.eq(true),
                    ))
                    .returning(MatchRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(accepted) = accepted else {
                        return Err(DieselError::RollbackTransaction);
                    };

                    diesel::update(
                        matches::table
                            .filter(matches::load_id.eq(load_uuid))
                            .filter(matches::id.ne(match_uuid))
                            .filter(matches::status.eq(MatchStatus::Pending.as_str())),
                    )
                    .set((
                        matches::status.eq(MatchStatus::Rejected.as_str()),
                        matches::shipper_responded.eq(true),
                    ))
                    .execute(conn)
                    .await?;

                    let load_rows = diesel::update(
                        loads::table
                            .filter(loads::id.eq(load_uuid))
                            .filter(loads::status.eq(LoadStatus::Pending.as_str())),
                    )
                    .set(loads::status.eq(LoadStatus::Matched.as_str()))
                    .execute(conn)
                    .await?;

                    if load_rows == 0 {
                        return Err(DieselError::RollbackTransaction);
                    }

                    Ok(accepted)
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(row) => row_to_match(row).map(Some),
            Err(DieselError::RollbackTransaction) => Ok(None),
            Err(error) => Err(map_diesel_error(error)),
        }
    }

    async fn reject_as_shipper(
        &self,
        id: &MatchId,
    ) -> Result<Option<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MatchRow> = diesel::update(
            matches::table
                .filter(matches::id.eq(id.as_uuid()))
                .filter(matches::status.eq(MatchStatus::Pending.as_str())),
        )
        .set((
            matches::status.eq(MatchStatus::Rejected.as_str()),
            matches::shipper_responded.eq(true),
        ))
        .returning(MatchRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_match).transpose()
    }

    async fn list_matched_for_trucker(
        &self,
        trucker_id: &UserId,
    ) -> Result<Vec<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MatchRow> = matches::table
            .filter(matches::trucker_id.eq(trucker_id.as_uuid()))
            .filter(matches::status.eq(MatchStatus::Matched.as_str()))
            .order(matches::created_at.desc())
            .select(MatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_match).collect()
    }

    async fn list_for_shipper(
        &self,
        shipper_id: &UserId,
    ) -> Result<Vec<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MatchRow> = matches::table
            .filter(matches::shipper_id.eq(shipper_id.as_uuid()))
            .order(matches::created_at.desc())
            .select(MatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_match).collect()
    }

    async fn list_all(&self) -> Result<Vec<Match>, MatchPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MatchRow> = matches::table
            .order(matches::created_at.desc())
            .select(MatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_match).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn fixture_row(status: &str) -> MatchRow {
        MatchRow {
            id: Uuid::new_v4(),
            load_id: Some(Uuid::new_v4()),
            trucker_id: Uuid::new_v4(),
            shipper_id: Uuid::new_v4(),
            status: status.to_owned(),
            shipper_responded: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn rows_convert_to_domain_matches() {
        let record = row_to_match(fixture_row("MATCHED")).expect("conversion");
        assert_eq!(record.status, MatchStatus::Matched);
        assert!(record.load_id.is_some());
    }

    #[rstest]
    fn unrecognised_statuses_surface_as_query_errors() {
        let error = row_to_match(fixture_row("GHOSTED")).expect_err("must fail");
        assert!(matches!(error, MatchPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(mapped, MatchPersistenceError::Connection { .. }));
    }
}
