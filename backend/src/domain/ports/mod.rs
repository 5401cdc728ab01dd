//! Domain ports: the edges of the hexagon.
//!
//! Driven ports (repositories, settlement gateway) describe what the core
//! expects from the persistence layer; driving ports (matching engine,
//! load lifecycle, review ledger, login) describe what adapters may ask
//! of the core. Every port exposes strongly typed errors so adapters map
//! failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod load_lifecycle;
mod load_repository;
mod login_service;
mod match_repository;
mod matching_engine;
mod review_ledger;
mod review_repository;
mod settlement;
mod user_repository;

#[cfg(test)]
pub use load_lifecycle::MockLoadLifecycle;
pub use load_lifecycle::{CancellationReceipt, LoadLifecycle};
#[cfg(test)]
pub use load_repository::MockLoadRepository;
pub use load_repository::{LoadPersistenceError, LoadRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{AuthenticatedUser, DirectoryLoginService, LoginError, LoginService};
#[cfg(test)]
pub use match_repository::MockMatchRepository;
pub use match_repository::{MatchPersistenceError, MatchRepository};
#[cfg(test)]
pub use matching_engine::MockMatchingEngine;
pub use matching_engine::{MatchDecision, MatchingEngine, SwipeOutcome};
#[cfg(test)]
pub use review_ledger::MockReviewLedger;
pub use review_ledger::{ReviewLedger, ReviewSummary};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewPersistenceError, ReviewRepository};
#[cfg(test)]
pub use settlement::MockCancellationGateway;
pub use settlement::{CancellationGateway, SettlementError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
