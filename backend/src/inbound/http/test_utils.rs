//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{
    LoadLifecycle, LoginService, MatchingEngine, MockLoadLifecycle, MockLoginService,
    MockMatchingEngine, MockReviewLedger, MockUserRepository, ReviewLedger, UserRepository,
};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build an [`HttpState`] for handler tests.
///
/// Every port defaults to an expectation-free mock, so a test only swaps in
/// the ports it actually exercises.
pub struct StateBuilder {
    matching: Arc<dyn MatchingEngine>,
    lifecycle: Arc<dyn LoadLifecycle>,
    reviews: Arc<dyn ReviewLedger>,
    login: Arc<dyn LoginService>,
    users: Arc<dyn UserRepository>,
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self {
            matching: Arc::new(MockMatchingEngine::new()),
            lifecycle: Arc::new(MockLoadLifecycle::new()),
            reviews: Arc::new(MockReviewLedger::new()),
            login: Arc::new(MockLoginService::new()),
            users: Arc::new(MockUserRepository::new()),
        }
    }
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matching(mut self, matching: impl MatchingEngine + 'static) -> Self {
        self.matching = Arc::new(matching);
        self
    }

    pub fn lifecycle(mut self, lifecycle: impl LoadLifecycle + 'static) -> Self {
        self.lifecycle = Arc::new(lifecycle);
        self
    }

    pub fn reviews(mut self, reviews: impl ReviewLedger + 'static) -> Self {
        self.reviews = Arc::new(reviews);
        self
    }

    pub fn login(mut self, login: impl LoginService + 'static) -> Self {
        self.login = Arc::new(login);
        self
    }

    pub fn users(mut self, users: impl UserRepository + 'static) -> Self {
        self.users = Arc::new(users);
        self
    }

    pub fn build(self) -> HttpState {
        HttpState::new(
            self.matching,
            self.lifecycle,
            self.reviews,
            self.login,
            self.users,
        )
    }
}
