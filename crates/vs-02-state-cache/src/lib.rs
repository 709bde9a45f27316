//! # View-State Cache
//!
//! **Subsystem ID:** vs-02
//!
//! ## Purpose
//!
//! Persists a rendered view's state between requests and restores it on
//! postback. Two strategies share one contract:
//!
//! | Strategy | Token carries | Server keeps |
//! |----------|---------------|--------------|
//! | Client | whole view, hash of view id, timestamp (sealed by vs-01) | nothing |
//! | Server | view key (hex, optionally sealed) | bounded collection per session |
//!
//! ## Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Round-trip until expiry | `service/client.rs`, `service/server.rs` |
//! | At most N views per session | `domain/collection/mod.rs` - `trim_total()` |
//! | At most M views per back-navigation chain | `domain/collection/mod.rs` - `trim_chain()` |
//! | Token for view A never restores view B | `SerializedViewKey::matches_view`, client payload hash |
//! | View scope destroyed once, after its last reference | `domain/collection/mod.rs` - refcounts |
//!
//! Expired, evicted and cross-view tokens restore as `Ok(None)`; tampered
//! tokens fail with `StateCacheError::Codec(CodecError::Integrity)`.
//!
//! ## Module Structure
//!
//! ```text
//! ports/inbound.rs       - StateCache trait
//! ports/outbound.rs      - ViewScopeProvider, TimeSource
//! service/mod.rs         - StateCacheService (strategy selection)
//! service/client.rs      - ClientSideStateCache
//! service/server.rs      - ServerSideStateCache
//! service/csrf.rs        - per-session anti-forgery token
//! domain/collection/     - SerializedViewCollection
//! domain/key_factory.rs  - counter / random view keys
//! domain/config.rs       - StateConfig and parameters
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::{ClientSideStateCache, ServerSideStateCache, StateCacheService};
