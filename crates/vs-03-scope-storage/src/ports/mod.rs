//! # Ports Layer
//!
//! - `inbound` - scope contexts offered to the host
//! - `outbound` - bean lifecycle required from the host

pub mod inbound;
pub mod outbound;

pub use inbound::ScopeContext;
pub use outbound::{BeanManager, Contextual};
