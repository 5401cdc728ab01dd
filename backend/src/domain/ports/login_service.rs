//! Port abstraction for the external identity context.
//!
//! Credential issuance and verification are not part of the core; this
//! port states the contract the core consumes: credentials in, an
//! authenticated `(user id, role)` pair out.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Role, UserId};

use super::define_port_error;
use super::user_repository::UserRepository;

define_port_error! {
    /// Errors raised by identity adapters.
    pub enum LoginError {
        /// The email/password pair did not resolve to an account.
        InvalidCredentials => "invalid credentials",
        /// The identity provider is unreachable.
        Unavailable { message: String } => "identity provider unavailable: {message}",
    }
}

/// Identity resolved for an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The account the credentials resolved to.
    pub user_id: UserId,
    /// Role fixed at signup.
    pub role: Role,
    /// Display name for the session greeting.
    pub name: String,
}

/// Driving port resolving credentials to an authenticated identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Resolve an email/password pair to an authenticated identity.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, LoginError>;
}

/// Directory-backed stand-in for the external identity provider.
///
/// Resolves the email against the user directory and accepts any password;
/// deployments wire a real verifier in its place. Kept here so the session
/// plumbing and role checks are exercisable end to end.
pub struct DirectoryLoginService {
    users: Arc<dyn UserRepository>,
}

impl DirectoryLoginService {
    /// Create a login service over the given user directory.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl LoginService for DirectoryLoginService {
    async fn authenticate(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AuthenticatedUser, LoginError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|error| LoginError::unavailable(error.to_string()))?
            .ok_or_else(LoginError::invalid_credentials)?;
        Ok(AuthenticatedUser {
            user_id: user.id,
            role: user.role,
            name: user.name,
        })
    }
}
