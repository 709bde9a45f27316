//! Outbound (Driven) ports for scope storage.
//!
//! The bean lifecycle belongs to the host container; storages only hold
//! instances and call back to create or destroy them.

use shared_types::ScopeLifecycleError;

use crate::domain::bean::{ContextualRef, CreationalContext, Instance};

/// A managed bean definition.
pub trait Contextual: Send + Sync {
    /// Construct a new instance.
    fn create(&self, creational: &CreationalContext) -> Instance;

    /// Tear down an instance created by [`create`](Self::create).
    fn destroy(
        &self,
        instance: Instance,
        creational: &CreationalContext,
    ) -> Result<(), ScopeLifecycleError>;

    /// Stable id for beans stored in passivation-capable scopes.
    fn passivation_id(&self) -> Option<&str> {
        None
    }
}

/// Resolves beans by passivation id.
pub trait BeanManager: Send + Sync {
    fn passivation_capable_bean(&self, id: &str) -> Option<ContextualRef>;
}
