//! # View Scope Bean Holder
//!
//! Per-session registry of view scopes. Reached through the session's
//! extension map; never a process-wide singleton.

use shared_types::{ScopeLifecycleError, Session};
use std::sync::Arc;

use crate::domain::{ContextualStorage, ContextualStorageRegistry};
use crate::ports::BeanManager;

#[derive(Debug)]
pub struct ViewScopeBeanHolder {
    registry: ContextualStorageRegistry,
}

impl ViewScopeBeanHolder {
    pub fn new(bean_manager: Arc<dyn BeanManager>) -> Self {
        Self {
            registry: ContextualStorageRegistry::new("view", bean_manager, true),
        }
    }

    /// The session's holder, created on first use. `None` once the session
    /// is invalidated.
    pub fn for_session(
        session: &Session,
        bean_manager: &Arc<dyn BeanManager>,
    ) -> Option<Arc<Self>> {
        session.attach_with(|| Self::new(Arc::clone(bean_manager)))
    }

    /// The session's holder if one was ever created.
    pub fn existing(session: &Session) -> Option<Arc<Self>> {
        session.get::<Self>()
    }

    pub fn generate_unique_view_scope_id(&self) -> String {
        self.registry.generate_unique_scope_id()
    }

    pub fn get_contextual_storage(
        &self,
        view_scope_id: &str,
        create_if_absent: bool,
    ) -> Option<Arc<ContextualStorage>> {
        self.registry
            .get_contextual_storage(view_scope_id, create_if_absent)
    }

    /// Destroy one view scope. `Ok(false)` if it did not exist.
    pub fn destroy_view_scope(&self, view_scope_id: &str) -> Result<bool, ScopeLifecycleError> {
        self.registry.destroy_scope(view_scope_id)
    }

    pub fn destroy_beans(&self) {
        self.registry.destroy_beans();
    }

    pub fn view_scope_ids(&self) -> Vec<String> {
        self.registry.scope_ids()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
