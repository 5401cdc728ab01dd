//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Following the hexagonal architecture pattern, this module provides the
//! concrete implementations of the domain's driven ports:
//!
//! - **persistence**: PostgreSQL-backed repositories and the cancellation
//!   settlement gateway, using Diesel ORM
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic; status preconditions
//! they re-check at write time are expressed as SQL guards, never as
//! read-then-decide logic.

pub mod persistence;
