//! # View-State Test Suite
//!
//! Cross-crate scenarios: the state cache (vs-02) driving view-scope
//! teardown in scope storage (vs-03) through the `ViewScopeProvider` port,
//! client tokens sealed by the codec (vs-01), and flow scopes bounded per
//! client window.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── support.rs       # beans, bean manager, tracing setup
//!     ├── server_state.rs  # server-side saving with live view scopes
//!     ├── client_state.rs  # client-side tokens, timeouts, configuration
//!     └── flow_scope.rs    # flow scopes per client window
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vs-tests
//! RUST_LOG=debug cargo test -p vs-tests integration::server_state
//! ```

#![allow(dead_code)]

pub mod integration;
