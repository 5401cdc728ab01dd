//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations; each adapter owns the
//! conversion from its row struct to the domain entity.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{loads, matches, reviews, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub balance: Decimal,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub balance: Decimal,
}

// ---------------------------------------------------------------------------
// Load models
// ---------------------------------------------------------------------------

/// Row struct for reading from the loads table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoadRow {
    pub id: Uuid,
    pub shipper_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub weight: Decimal,
    pub budget: Decimal,
    pub deadline: NaiveDate,
    pub description: String,
    pub status: String,
    pub shipper_in_transit_confirmed: bool,
    pub trucker_in_transit_confirmed: bool,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new load records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = loads)]
pub(crate) struct NewLoadRow<'a> {
    pub id: Uuid,
    pub shipper_id: Uuid,
    pub origin: &'a str,
    pub destination: &'a str,
    pub weight: Decimal,
    pub budget: Decimal,
    pub deadline: NaiveDate,
    pub description: &'a str,
    pub status: &'a str,
    pub shipper_in_transit_confirmed: bool,
    pub trucker_in_transit_confirmed: bool,
}

// ---------------------------------------------------------------------------
// Match models
// ---------------------------------------------------------------------------

/// Row struct for reading from the matches table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MatchRow {
    pub id: Uuid,
    pub load_id: Option<Uuid>,
    pub trucker_id: Uuid,
    pub shipper_id: Uuid,
    pub status: String,
    pub shipper_responded: bool,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new match records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = matches)]
pub(crate) struct NewMatchRow<'a> {
    pub id: Uuid,
    pub load_id: Option<Uuid>,
    pub trucker_id: Uuid,
    pub shipper_id: Uuid,
    pub status: &'a str,
    pub shipper_responded: bool,
}

// ---------------------------------------------------------------------------
// Review models
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub load_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewed_id: Uuid,
    pub rating: i16,
    pub comment: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new review records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub load_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewed_id: Uuid,
    pub rating: i16,
    pub comment: &'a str,
}
