//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{LoadId, Rating, Review, ReviewId, UserId};

use super::models::{NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the `ReviewRepository` port.
///
/// The unique index on `(load_id, reviewer_id)` backs the one-review-per
/// -party rule; a violated insert surfaces as the `Duplicate` variant.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain review persistence errors.
fn map_pool_error(error: PoolError) -> ReviewPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ReviewPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain review persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> ReviewPersistenceError {
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
        DieselError::NotFound => ReviewPersistenceError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            ReviewPersistenceError::duplicate(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ReviewPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => ReviewPersistenceError::query("database error"),
        _ => ReviewPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain review.
fn row_to_review(row: ReviewRow) -> Result<Review, ReviewPersistenceError> {
    let rating = Rating::new(row.rating).map_err(|_| {
        ReviewPersistenceError::query(format!("rating out of range: {}", row.rating))
    })?;

    Ok(Review {
        id: ReviewId::from_uuid(row.id),
        load_id: LoadId::from_uuid(row.load_id),
        reviewer_id: UserId::from_uuid(row.reviewer_id),
        reviewed_id: UserId::from_uuid(row.reviewed_id),
        rating,
        comment: row.comment,
    })
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewReviewRow {
            id: *review.id.as_uuid(),
            load_id: *review.load_id.as_uuid(),
            reviewer_id: *review.reviewer_id.as_uuid(),
            reviewed_id: *review.reviewed_id.as_uuid(),
            rating: review.rating.value(),
            comment: &review.comment,
        };

        diesel::insert_into(reviews::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn find_by_load_and_reviewer(
        &self,
        load_id: &LoadId,
        reviewer_id: &UserId,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ReviewRow> = reviews::table
            .filter(reviews::load_id.eq(load_id.as_uuid()))
            .filter(reviews::reviewer_id.eq(reviewer_id.as_uuid()))
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_review).transpose()
    }

    async fn list_for_reviewed(
        &self,
        reviewed_id: &UserId,
    ) -> Result<Vec<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReviewRow> = reviews::table
            .filter(reviews::reviewed_id.eq(reviewed_id.as_uuid()))
            .order(reviews::created_at.desc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_review).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn fixture_row(rating: i16) -> ReviewRow {
        ReviewRow {
            id: Uuid::new_v4(),
            load_id: Uuid::new_v4(),
            reviewer_id: Uuid::new_v4(),
            reviewed_id: Uuid::new_v4(),
            rating,
            comment: "on time".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn rows_convert_to_domain_reviews() {
        let review = row_to_review(fixture_row(4)).expect("conversion");
        assert_eq!(review.rating.value(), 4);
        assert_eq!(review.comment, "on time");
    }

    #[rstest]
    fn out_of_range_ratings_surface_as_query_errors() {
        let error = row_to_review(fixture_row(9)).expect_err("must fail");
        assert!(matches!(error, ReviewPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(mapped, ReviewPersistenceError::Connection { .. }));
    }
}
