//! Matches: proposed pairings between a trucker and a shipper, optionally
//! scoped to a single load.
//!
//! A load-scoped match is keyed by its `(load_id, trucker_id)` pair;
//! repeated swipes update the existing record, they never duplicate it.
//! Person-to-person matches (from the generic swipe path) carry no load.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::load::LoadId;
use super::user::UserId;

/// Stable match identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MatchId(Uuid);

impl MatchId {
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

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Accept/reject lifecycle of a match, independent of the load's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// One party accepted; waiting on the other.
    Pending,
    /// Both parties accepted. At most one match per load holds this state.
    Matched,
    /// Declined. Revivable by a later trucker right-swipe only while the
    /// shipper has not responded.
    Rejected,
}

impl MatchStatus {
    /// Storage representation, matching the database strings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Matched => "MATCHED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is unrecognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match status: {0}")]
pub struct UnknownMatchStatus(pub String);

impl FromStr for MatchStatus {
    type Err = UnknownMatchStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "MATCHED" => Ok(Self::Matched),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(UnknownMatchStatus(other.to_owned())),
        }
    }
}

/// Directional swipe signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Accept intent.
    Right,
    /// Decline.
    Left,
}

impl SwipeDirection {
    /// Initial match status produced by a first swipe in this direction.
    pub const fn initial_status(self) -> MatchStatus {
        match self {
            Self::Right => MatchStatus::Pending,
            Self::Left => MatchStatus::Rejected,
        }
    }
}

/// Error returned for a swipe direction outside `right`/`left`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid swipe direction: {0}")]
pub struct InvalidSwipeDirection(pub String);

impl FromStr for SwipeDirection {
    type Err = InvalidSwipeDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" => Ok(Self::Right),
            "left" => Ok(Self::Left),
            other => Err(InvalidSwipeDirection(other.to_owned())),
        }
    }
}

/// A proposed pairing between one trucker and one shipper.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Stable identifier.
    pub id: MatchId,
    /// The load this match is scoped to; `None` for person-to-person
    /// matches created by the generic swipe path.
    pub load_id: Option<LoadId>,
    /// Trucker side of the pairing.
    pub trucker_id: UserId,
    /// Shipper side, denormalised from the load at creation.
    pub shipper_id: UserId,
    /// Accept/reject state.
    pub status: MatchStatus,
    /// Set once the shipper has responded; a shipper rejection is terminal
    /// while a trucker's own left-swipe is not.
    pub shipper_responded: bool,
}

impl Match {
    /// Create a load-scoped match from a trucker's first swipe.
    pub fn for_load(
        load_id: LoadId,
        trucker_id: UserId,
        shipper_id: UserId,
        direction: SwipeDirection,
    ) -> Self {
        Self {
            id: MatchId::random(),
            load_id: Some(load_id),
            trucker_id,
            shipper_id,
            status: direction.initial_status(),
            shipper_responded: false,
        }
    }

    /// Create a person-to-person match from a first directional swipe.
    pub fn between(trucker_id: UserId, shipper_id: UserId, direction: SwipeDirection) -> Self {
        Self {
            id: MatchId::random(),
            load_id: None,
            trucker_id,
            shipper_id,
            status: direction.initial_status(),
            shipper_responded: false,
        }
    }

    /// Whether a trucker may still change this match with a fresh swipe.
    ///
    /// `Matched` is always final, and a rejection entered by the shipper's
    /// response is final too; the trucker's own earlier left-swipe is not.
    pub const fn open_to_trucker(&self) -> bool {
        match self.status {
            MatchStatus::Matched => false,
            MatchStatus::Pending => true,
            MatchStatus::Rejected => !self.shipper_responded,
        }
    }
}
