//! Outbound (Driven) ports for the state cache.
//!
//! Both live in `shared-types` so the scope-storage crate can implement the
//! provider without depending on this crate.

pub use shared_types::{SystemTimeSource, TimeSource, ViewScopeProvider};
