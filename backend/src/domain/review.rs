//! Reviews: post-completion ratings between the two parties of a load.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::load::LoadId;
use super::user::UserId;

/// Stable review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read back from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A star rating in `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Rating(i16);

/// Error returned for out-of-range ratings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rating must be between 1 and 5")]
pub struct InvalidRating;

impl Rating {
    /// Validate and construct a rating.
    pub const fn new(value: i16) -> Result<Self, InvalidRating> {
        if value >= 1 && value <= 5 {
            Ok(Self(value))
        } else {
            Err(InvalidRating)
        }
    }

    /// The numeric value.
    pub const fn value(&self) -> i16 {
        self.0
    }
}

/// A rating one party left for the other after a load completed.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// Stable identifier.
    pub id: ReviewId,
    /// The completed load being reviewed.
    pub load_id: LoadId,
    /// The party writing the review.
    pub reviewer_id: UserId,
    /// The counterparty being reviewed.
    pub reviewed_id: UserId,
    /// Star rating.
    pub rating: Rating,
    /// Free-form comment.
    pub comment: String,
}

impl Review {
    /// Create a review record.
    pub fn new(
        load_id: LoadId,
        reviewer_id: UserId,
        reviewed_id: UserId,
        rating: Rating,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: ReviewId::random(),
            load_id,
            reviewer_id,
            reviewed_id,
            rating,
            comment: comment.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratings_outside_one_to_five_are_rejected() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(1).map(|r| r.value()), Ok(1));
        assert_eq!(Rating::new(5).map(|r| r.value()), Ok(5));
    }
}
