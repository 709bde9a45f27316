//! # Service Layer
//!
//! Session-bound holders and the adapters built on them.

mod context;
mod flow_holder;
mod provider;
mod view_holder;


pub use context::{FlowScopeContext, ViewScopeContext};
pub use flow_holder::FlowScopeBeanHolder;
pub use provider::BeanHolderViewScopeProvider;
pub use view_holder::ViewScopeBeanHolder;
