//! Response DTOs for the REST surface.
//!
//! Domain entities stay serialization-free; these types fix the wire shape
//! (camelCase keys, decimal amounts as strings) and carry the utoipa
//! schemas.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Load, LoadId, LoadStatus, Match, MatchId, MatchStatus, Rating, Review, ReviewId, Role, User,
    UserId,
};
use crate::domain::ports::{CancellationReceipt, ReviewSummary, SwipeOutcome};

/// A registered account, without credential material.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Decimal amount rendered as a string, e.g. `"95.00"`.
    #[schema(example = "100.00")]
    pub balance: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            balance: user.balance.to_string(),
        }
    }
}

/// A posted load and its lifecycle state.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadDto {
    pub id: LoadId,
    pub shipper_id: UserId,
    pub origin: String,
    pub destination: String,
    #[schema(example = "1200")]
    pub weight: String,
    #[schema(example = "850.00")]
    pub budget: String,
    pub deadline: NaiveDate,
    pub description: String,
    pub status: LoadStatus,
    pub shipper_in_transit_confirmed: bool,
    pub trucker_in_transit_confirmed: bool,
}

impl From<Load> for LoadDto {
    fn from(load: Load) -> Self {
        Self {
            id: load.id,
            shipper_id: load.shipper_id,
            origin: load.origin.as_str().to_owned(),
            destination: load.destination.as_str().to_owned(),
            weight: load.weight.to_string(),
            budget: load.budget.to_string(),
            deadline: load.deadline,
            description: load.description,
            status: load.status,
            shipper_in_transit_confirmed: load.shipper_in_transit_confirmed,
            trucker_in_transit_confirmed: load.trucker_in_transit_confirmed,
        }
    }
}

/// A proposed or decided pairing.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub id: MatchId,
    pub load_id: Option<LoadId>,
    pub trucker_id: UserId,
    pub shipper_id: UserId,
    pub status: MatchStatus,
}

impl From<Match> for MatchDto {
    fn from(record: Match) -> Self {
        Self {
            id: record.id,
            load_id: record.load_id,
            trucker_id: record.trucker_id,
            shipper_id: record.shipper_id,
            status: record.status,
        }
    }
}

/// Result of a directional swipe.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    /// Whether this swipe produced mutual acceptance.
    pub matched: bool,
    #[serde(rename = "match")]
    pub record: MatchDto,
}

impl From<SwipeOutcome> for SwipeResponse {
    fn from(outcome: SwipeOutcome) -> Self {
        Self {
            matched: outcome.matched,
            record: outcome.record.into(),
        }
    }
}

/// Result of cancelling a matched load.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    pub load: LoadDto,
    /// Shipper balance after the fee debit, as a decimal string.
    #[schema(example = "95.00")]
    pub new_balance: String,
}

impl From<CancellationReceipt> for CancellationResponse {
    fn from(receipt: CancellationReceipt) -> Self {
        Self {
            load: receipt.load.into(),
            new_balance: receipt.new_balance.to_string(),
        }
    }
}

/// A submitted review.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: ReviewId,
    pub load_id: LoadId,
    pub reviewer_id: UserId,
    pub reviewed_id: UserId,
    pub rating: Rating,
    pub comment: String,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            load_id: review.load_id,
            reviewer_id: review.reviewer_id,
            reviewed_id: review.reviewed_id,
            rating: review.rating,
            comment: review.comment,
        }
    }
}

/// Reviews about one user plus their average rating.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResponse {
    pub reviews: Vec<ReviewDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

impl From<ReviewSummary> for ReviewsResponse {
    fn from(summary: ReviewSummary) -> Self {
        Self {
            reviews: summary.reviews.into_iter().map(Into::into).collect(),
            average_rating: summary.average_rating,
        }
    }
}
