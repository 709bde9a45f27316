//! # Ports
//!
//! - `inbound`: the state cache API used by the request lifecycle
//! - `outbound`: host-framework collaborators

pub mod inbound;
pub mod outbound;

pub use inbound::StateCache;
pub use outbound::{SystemTimeSource, TimeSource, ViewScopeProvider};
