//! # Ports
//!
//! - `inbound`: the codec API consumed by the state caches
//! - `outbound`: pluggable view serialization

pub mod inbound;
pub mod outbound;

pub use inbound::StateCodecApi;
pub use outbound::{BincodeViewStateSerializer, ViewStateSerializer};
