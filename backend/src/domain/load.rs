//! Loads: shipment requests posted by shippers.
//!
//! The status enum is the single source of truth for lifecycle legality;
//! every transition the services perform is checked against
//! [`LoadStatus::can_transition_to`] so illegal moves cannot be expressed
//! as scattered conditionals.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Stable load identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct LoadId(Uuid);

impl LoadId {
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

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LoadId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle state of a load.
///
/// Terminal states are [`Completed`](Self::Completed) and
/// [`Cancelled`](Self::Cancelled); no operation moves a load backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    /// Posted, visible to truckers, no accepted match yet.
    Pending,
    /// Exactly one match accepted; awaiting dual transit confirmation.
    Matched,
    /// Both parties confirmed transit.
    InTransit,
    /// Delivered and closed by the shipper.
    Completed,
    /// Cancelled by the shipper after matching; the cancellation fee was
    /// charged.
    Cancelled,
}

impl LoadStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Matched)
                | (Self::Matched, Self::InTransit)
                | (Self::Matched, Self::Cancelled)
                | (Self::InTransit, Self::Completed)
        )
    }

    /// Storage representation, matching the database strings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Matched => "MATCHED",
            Self::InTransit => "IN_TRANSIT",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is unrecognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown load status: {0}")]
pub struct UnknownLoadStatus(pub String);

impl FromStr for LoadStatus {
    type Err = UnknownLoadStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "MATCHED" => Ok(Self::Matched),
            "IN_TRANSIT" => Ok(Self::InTransit),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(UnknownLoadStatus(other.to_owned())),
        }
    }
}

/// Validation errors raised while drafting a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadValidationError {
    /// Origin or destination is blank.
    EmptyAddress,
    /// Origin and destination normalise to the same place.
    SameOriginAndDestination,
    /// Weight must be strictly positive.
    NonPositiveWeight,
    /// Budget must be strictly positive.
    NonPositiveBudget,
    /// Deadline is before today (UTC, date-only comparison).
    DeadlineInPast,
}

impl fmt::Display for LoadValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "origin and destination must not be empty"),
            Self::SameOriginAndDestination => {
                write!(f, "origin and destination cannot be the same")
            }
            Self::NonPositiveWeight => write!(f, "weight must be a positive number"),
            Self::NonPositiveBudget => write!(f, "budget must be a positive number"),
            Self::DeadlineInPast => write!(f, "deadline cannot be in the past"),
        }
    }
}

impl std::error::Error for LoadValidationError {}

impl LoadValidationError {
    /// The request field the error refers to, for structured error details.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyAddress | Self::SameOriginAndDestination => "destination",
            Self::NonPositiveWeight => "weight",
            Self::NonPositiveBudget => "budget",
            Self::DeadlineInPast => "deadline",
        }
    }
}

/// Opaque structured address. Never geocoded or routed by the core; only
/// compared for the origin-equals-destination check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Validate and construct an address.
    pub fn new(raw: impl Into<String>) -> Result<Self, LoadValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(LoadValidationError::EmptyAddress);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw address text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case- and whitespace-insensitive form used for equality checks.
    fn normalized(&self) -> String {
        self.0.trim().to_lowercase()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated field set for posting a new load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDraft {
    /// Pickup address.
    pub origin: Address,
    /// Drop-off address.
    pub destination: Address,
    /// Shipment weight, strictly positive.
    pub weight: Decimal,
    /// Offered budget, strictly positive.
    pub budget: Decimal,
    /// Latest acceptable delivery date (UTC).
    pub deadline: NaiveDate,
    /// Free-form shipment description.
    pub description: String,
}

impl LoadDraft {
    /// Validate the draft fields.
    ///
    /// `today` is the current UTC date supplied by the caller's clock so
    /// the deadline rule stays testable.
    pub fn validate(&self, today: NaiveDate) -> Result<(), LoadValidationError> {
        if self.origin.normalized() == self.destination.normalized() {
            return Err(LoadValidationError::SameOriginAndDestination);
        }
        if self.weight <= Decimal::ZERO {
            return Err(LoadValidationError::NonPositiveWeight);
        }
        if self.budget <= Decimal::ZERO {
            return Err(LoadValidationError::NonPositiveBudget);
        }
        if self.deadline < today {
            return Err(LoadValidationError::DeadlineInPast);
        }
        Ok(())
    }
}

/// A shipment request and its lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub struct Load {
    /// Stable identifier.
    pub id: LoadId,
    /// Owning shipper, immutable after creation.
    pub shipper_id: UserId,
    /// Pickup address.
    pub origin: Address,
    /// Drop-off address.
    pub destination: Address,
    /// Shipment weight.
    pub weight: Decimal,
    /// Offered budget.
    pub budget: Decimal,
    /// Latest acceptable delivery date.
    pub deadline: NaiveDate,
    /// Free-form shipment description.
    pub description: String,
    /// Current lifecycle state.
    pub status: LoadStatus,
    /// Shipper's transit acknowledgement; meaningful only while `Matched`,
    /// never reset afterwards.
    pub shipper_in_transit_confirmed: bool,
    /// Trucker's transit acknowledgement; same semantics as the shipper's.
    pub trucker_in_transit_confirmed: bool,
}

impl Load {
    /// Create a `Pending` load from a validated draft.
    pub fn from_draft(shipper_id: UserId, draft: LoadDraft) -> Self {
        Self {
            id: LoadId::random(),
            shipper_id,
            origin: draft.origin,
            destination: draft.destination,
            weight: draft.weight,
            budget: draft.budget,
            deadline: draft.deadline,
            description: draft.description,
            status: LoadStatus::Pending,
            shipper_in_transit_confirmed: false,
            trucker_in_transit_confirmed: false,
        }
    }
}
