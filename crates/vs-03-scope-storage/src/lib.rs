//! # Scope Storage
//!
//! **Subsystem ID:** vs-03
//!
//! ## Purpose
//!
//! Session-bound registries of live scoped instances:
//!
//! | Scope | Keyed by | Bounded by |
//! |-------|----------|------------|
//! | View | view-scope id (one page instance) | saved views referencing it (vs-02) |
//! | Flow | `{client window}_{document}_{flow}` | LRU over client windows |
//!
//! ## Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | One instance per bean per scope, even under races | `domain/storage.rs` - `create_contextual_instance()` |
//! | A destroyed storage is never handed out again | `domain/registry.rs` - `get_contextual_storage()` |
//! | Bean callbacks never run under a registry-wide lock | `domain/registry.rs` - `destroy_beans()` |
//! | Evicted client window takes its flows with it | `service/flow_holder.rs` - `destroy_window_flows()` |
//!
//! ## Module Structure
//!
//! ```text
//! ports/inbound.rs         - ScopeContext trait
//! ports/outbound.rs        - Contextual, BeanManager
//! service/view_holder.rs   - ViewScopeBeanHolder
//! service/flow_holder.rs   - FlowScopeBeanHolder
//! service/provider.rs      - ViewScopeProvider adapter for vs-02
//! service/context.rs       - ViewScopeContext, FlowScopeContext
//! domain/storage.rs        - ContextualStorage
//! domain/registry.rs       - ContextualStorageRegistry
//! domain/lru.rs            - EvictingLru
//! domain/flow.rs           - Flow, FlowBuilder
//! ```

pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use domain::*;
pub use ports::*;
pub use service::{
    BeanHolderViewScopeProvider, FlowScopeBeanHolder, FlowScopeContext, ViewScopeBeanHolder,
    ViewScopeContext,
};
