//! User accounts and the per-request identity context.
//!
//! The core only reads a user's role and balance and writes balance
//! decrements; account provisioning and credential handling live behind
//! the [`crate::domain::ports::LoginService`] port.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Party role attached to every authenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Posts loads and responds to matches.
    Shipper,
    /// Swipes on loads and hauls them.
    Trucker,
    /// Operational oversight; may list but not drive the lifecycle.
    Admin,
}

impl Role {
    /// Storage representation, matching the database enum strings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shipper => "SHIPPER",
            Self::Trucker => "TRUCKER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored role string is unrecognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHIPPER" => Ok(Self::Shipper),
            "TRUCKER" => Ok(Self::Trucker),
            "ADMIN" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Authenticated `(user id, role)` pair resolved by the identity context.
///
/// Threaded explicitly through every core operation instead of being read
/// from ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// The authenticated user.
    pub user_id: UserId,
    /// Role the user signed up with.
    pub role: Role,
}

impl Identity {
    /// Bundle a user id and role.
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// A registered account.
///
/// `balance` is only ever decremented by load cancellation; the non-negative
/// invariant is enforced at debit time inside the settlement transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Display name shown to counterparties.
    pub name: String,
    /// Contact address, unique across accounts.
    pub email: String,
    /// Party role fixed at signup.
    pub role: Role,
    /// Current monetary balance.
    pub balance: Decimal,
}

impl User {
    /// Create an account with the given starting balance.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        balance: Decimal,
    ) -> Self {
        Self {
            id: UserId::random(),
            name: name.into(),
            email: email.into(),
            role,
            balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_strings() {
        for role in [Role::Shipper, Role::Trucker, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("DISPATCHER".parse::<Role>().is_err());
    }
}
