//! # Request Context
//!
//! Per-request state threaded through save/restore and scope lookups.
//! Owned by the thread handling the request; the [`Session`] it points to is
//! shared with concurrent requests of the same browser session.

use std::sync::Arc;

use crate::entities::SerializedViewKey;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct RequestContext {
    session: Arc<Session>,
    view_id: Option<String>,
    client_window_id: Option<String>,
    view_scope_id: Option<String>,
    restored_view_key: Option<SerializedViewKey>,
}

impl RequestContext {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            view_id: None,
            client_window_id: None,
            view_scope_id: None,
            restored_view_key: None,
        }
    }

    pub fn with_view_id(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }

    pub fn with_client_window_id(mut self, window_id: impl Into<String>) -> Self {
        self.client_window_id = Some(window_id.into());
        self
    }

    pub fn with_view_scope_id(mut self, view_scope_id: impl Into<String>) -> Self {
        self.view_scope_id = Some(view_scope_id.into());
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn view_id(&self) -> Option<&str> {
        self.view_id.as_deref()
    }

    pub fn set_view_id(&mut self, view_id: impl Into<String>) {
        self.view_id = Some(view_id.into());
    }

    /// Browser tab this request belongs to.
    pub fn client_window_id(&self) -> Option<&str> {
        self.client_window_id.as_deref()
    }

    /// View scope attached to the view being processed.
    pub fn view_scope_id(&self) -> Option<&str> {
        self.view_scope_id.as_deref()
    }

    pub fn set_view_scope_id(&mut self, view_scope_id: Option<String>) {
        self.view_scope_id = view_scope_id;
    }

    /// Key of the view restored earlier in this request, if any.
    ///
    /// The next server-side save uses it to extend the sequential chain.
    pub fn restored_view_key(&self) -> Option<&SerializedViewKey> {
        self.restored_view_key.as_ref()
    }

    pub fn set_restored_view_key(&mut self, key: Option<SerializedViewKey>) {
        self.restored_view_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fields() {
        let ctx = RequestContext::new(Session::new_shared())
            .with_view_id("/index.xhtml")
            .with_client_window_id("w1")
            .with_view_scope_id("vs-1");

        assert_eq!(ctx.view_id(), Some("/index.xhtml"));
        assert_eq!(ctx.client_window_id(), Some("w1"));
        assert_eq!(ctx.view_scope_id(), Some("vs-1"));
        assert!(ctx.restored_view_key().is_none());
    }
}
