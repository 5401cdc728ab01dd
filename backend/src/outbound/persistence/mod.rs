//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository and settlement ports,
//! backed by PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel rows and domain types. No business logic resides here.
//! - **Guarded writes**: every status precondition is re-validated inside
//!   the mutating statement itself (`UPDATE ... WHERE status = ...`), so a
//!   stale in-memory read can never commit an invalid transition.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) are implementation details, never exposed to the domain.
//! - **Strongly typed errors**: all database errors are mapped to the
//!   domain's persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use freightswipe::outbound::persistence::{DbPool, PoolConfig, DieselLoadRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/freight")).await?;
//! let loads = DieselLoadRepository::new(pool);
//! ```

mod diesel_cancellation_gateway;
mod diesel_load_repository;
mod diesel_match_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_cancellation_gateway::DieselCancellationGateway;
pub use diesel_load_repository::DieselLoadRepository;
pub use diesel_match_repository::DieselMatchRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
