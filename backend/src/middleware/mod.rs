//! HTTP middleware shared across the inbound surface.

pub mod trace;

pub use trace::Trace;
