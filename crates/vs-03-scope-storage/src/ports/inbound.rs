//! Inbound (Driving) ports for scope storage.

use shared_types::RequestContext;
use std::sync::Arc;

use crate::domain::{ContextualRef, CreationalContext, Instance, ScopeError};

/// Access to the instances of one scope type for the current request.
pub trait ScopeContext: Send + Sync {
    fn scope_name(&self) -> &'static str;

    /// Whether the request currently has a scope of this type.
    fn is_active(&self, ctx: &RequestContext) -> bool;

    /// Instance of `bean` in the current scope, created if missing.
    fn get(
        &self,
        ctx: &RequestContext,
        bean: &ContextualRef,
        creational_context: Arc<CreationalContext>,
    ) -> Result<Instance, ScopeError>;

    /// Instance of `bean` in the current scope, without creating it.
    fn get_if_exists(
        &self,
        ctx: &RequestContext,
        bean: &ContextualRef,
    ) -> Result<Option<Instance>, ScopeError>;
}
