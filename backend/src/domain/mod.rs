//! Core domain: entities, value types, services, and ports.
//!
//! The matching engine and lifecycle controller live here, framework
//! free; inbound adapters call them through the driving ports and driven
//! adapters plug in behind the repository ports.

mod error;
mod freight_match;
mod lifecycle_service;
mod load;
mod matching_service;
mod port_error_mapping;
pub mod ports;
mod review;
mod review_service;
mod user;

#[cfg(test)]
mod matching_service_tests;

pub use error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use freight_match::{
    InvalidSwipeDirection, Match, MatchId, MatchStatus, SwipeDirection, UnknownMatchStatus,
};
pub use lifecycle_service::{CANCELLATION_FEE, LoadLifecycleService};
pub use load::{
    Address, Load, LoadDraft, LoadId, LoadStatus, LoadValidationError, UnknownLoadStatus,
};
pub use matching_service::MatchingService;
pub use review::{InvalidRating, Rating, Review, ReviewId};
pub use review_service::ReviewService;
pub use user::{Identity, Role, UnknownRole, User, UserId};
