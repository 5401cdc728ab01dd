//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. Diesel
//! uses them for compile-time query validation and type-safe SQL
//! generation; when a migration changes the schema, regenerate this file
//! with `diesel print-schema` or update it by hand.

diesel::table! {
    /// User accounts table.
    ///
    /// One row per registered shipper, trucker, or admin. The `email`
    /// column carries a unique index.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Login email, unique, stored lowercased.
        email -> Varchar,
        /// Account role: SHIPPER, TRUCKER, or ADMIN.
        role -> Varchar,
        /// Spendable balance, debited by cancellation fees.
        balance -> Numeric,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Freight loads posted by shippers.
    loads (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning shipper.
        shipper_id -> Uuid,
        /// Pickup address.
        origin -> Varchar,
        /// Delivery address.
        destination -> Varchar,
        /// Cargo weight.
        weight -> Numeric,
        /// Offered payment.
        budget -> Numeric,
        /// Delivery deadline.
        deadline -> Date,
        /// Free-form cargo description.
        description -> Text,
        /// Lifecycle status: PENDING, MATCHED, IN_TRANSIT, COMPLETED, or CANCELLED.
        status -> Varchar,
        /// Shipper's transit confirmation flag.
        shipper_in_transit_confirmed -> Bool,
        /// Trucker's transit confirmation flag.
        trucker_in_transit_confirmed -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Swipe pairings between truckers and shippers.
    ///
    /// Load-bound rows carry a unique `(load_id, trucker_id)` index so a
    /// trucker's repeated swipes update one row instead of creating more.
    matches (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Load the pairing is about, or null for person-to-person swipes.
        load_id -> Nullable<Uuid>,
        /// Trucker side of the pairing.
        trucker_id -> Uuid,
        /// Shipper side of the pairing.
        shipper_id -> Uuid,
        /// Pairing status: PENDING, MATCHED, or REJECTED.
        status -> Varchar,
        /// Whether the shipper has issued a terminal response.
        shipper_responded -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Post-completion reviews.
    ///
    /// A unique `(load_id, reviewer_id)` index enforces one review per
    /// party per load.
    reviews (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Completed load the review is about.
        load_id -> Uuid,
        /// Author of the review.
        reviewer_id -> Uuid,
        /// Counterparty being reviewed.
        reviewed_id -> Uuid,
        /// Star rating, 1 to 5.
        rating -> Int2,
        /// Free-form comment.
        comment -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(loads -> users (shipper_id));
diesel::joinable!(matches -> loads (load_id));
diesel::joinable!(reviews -> loads (load_id));

diesel::allow_tables_to_appear_in_same_query!(users, loads, matches, reviews);
