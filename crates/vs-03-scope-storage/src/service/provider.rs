//! # View Scope Provider
//!
//! Adapts the session's [`ViewScopeBeanHolder`] to the `ViewScopeProvider`
//! port consumed by the state cache.

use shared_types::{ScopeLifecycleError, Session, ViewScopeProvider};
use std::fmt;
use std::sync::Arc;

use super::flow_holder::FlowScopeBeanHolder;
use super::view_holder::ViewScopeBeanHolder;
use crate::domain::random_scope_id;
use crate::ports::BeanManager;

pub struct BeanHolderViewScopeProvider {
    bean_manager: Arc<dyn BeanManager>,
}

impl BeanHolderViewScopeProvider {
    pub fn new(bean_manager: Arc<dyn BeanManager>) -> Self {
        Self { bean_manager }
    }

    fn holder(&self, session: &Session) -> Option<Arc<ViewScopeBeanHolder>> {
        ViewScopeBeanHolder::for_session(session, &self.bean_manager)
    }
}

impl ViewScopeProvider for BeanHolderViewScopeProvider {
    /// On an invalidated session the id is random and nothing is attached.
    fn generate_view_scope_id(&self, session: &Session) -> String {
        match self.holder(session) {
            Some(holder) => holder.generate_unique_view_scope_id(),
            None => random_scope_id(),
        }
    }

    /// No-op on an invalidated session.
    fn create_view_scope_map(&self, session: &Session, view_scope_id: &str) {
        let created = self
            .holder(session)
            .and_then(|holder| holder.get_contextual_storage(view_scope_id, true));
        if created.is_some() {
            tracing::debug!(
                session = %session.id(),
                view_scope_id,
                "[vs-03] Created view scope"
            );
        }
    }

    fn restore_view_scope_map(&self, session: &Session, view_scope_id: &str) -> bool {
        ViewScopeBeanHolder::existing(session)
            .and_then(|holder| holder.get_contextual_storage(view_scope_id, false))
            .is_some()
    }

    fn destroy_view_scope_map(
        &self,
        session: &Session,
        view_scope_id: &str,
    ) -> Result<(), ScopeLifecycleError> {
        match ViewScopeBeanHolder::existing(session) {
            Some(holder) => holder.destroy_view_scope(view_scope_id).map(|_| ()),
            None => Ok(()),
        }
    }

    fn on_session_destroyed(&self, session: &Session) {
        if let Some(holder) = ViewScopeBeanHolder::existing(session) {
            holder.destroy_beans();
        }
        if let Some(holder) = FlowScopeBeanHolder::existing(session) {
            holder.destroy_beans();
        }
        tracing::info!(session = %session.id(), "[vs-03] Destroyed session scopes");
    }
}

impl fmt::Debug for BeanHolderViewScopeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanHolderViewScopeProvider").finish_non_exhaustive()
    }
}
