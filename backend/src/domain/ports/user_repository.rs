//! Port abstraction for user account persistence.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email address.
        DuplicateEmail { email: String } => "email already exists: {email}",
    }
}

/// Driven port for user account storage.
///
/// The core reads roles and balances through this port; balance debits
/// happen exclusively inside [`super::CancellationGateway`] transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// List every account in the directory.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;
}
