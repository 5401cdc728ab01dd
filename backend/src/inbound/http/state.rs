//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoadLifecycle, LoginService, MatchingEngine, ReviewLedger, UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub matching: Arc<dyn MatchingEngine>,
    pub lifecycle: Arc<dyn LoadLifecycle>,
    pub reviews: Arc<dyn ReviewLedger>,
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserRepository>,
}

impl HttpState {
    /// Bundle the driving ports and the user directory.
    pub fn new(
        matching: Arc<dyn MatchingEngine>,
        lifecycle: Arc<dyn LoadLifecycle>,
        reviews: Arc<dyn ReviewLedger>,
        login: Arc<dyn LoginService>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            matching,
            lifecycle,
            reviews,
            login,
            users,
        }
    }
}
