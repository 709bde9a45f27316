//! # Flow Scope Bean Holder
//!
//! Per-session registry of flow scopes. Each client window keeps a stack of
//! active flow-map keys, newest first. Windows are bounded by an LRU; when a
//! window falls out, every flow storage it owned is destroyed.
//!
//! Evicted windows are torn down after the window map is unlocked, still
//! within the call that evicted them.

use parking_lot::Mutex;
use shared_types::{RequestContext, Session};
use std::fmt;
use std::sync::Arc;

use crate::domain::{
    ContextualStorage, ContextualStorageRegistry, EvictingLru, Flow, ScopeConfig, ScopeError,
};
use crate::ports::BeanManager;

pub struct FlowScopeBeanHolder {
    registry: ContextualStorageRegistry,
    windows: Mutex<EvictingLru<String, Vec<String>>>,
}

impl FlowScopeBeanHolder {
    pub fn new(bean_manager: Arc<dyn BeanManager>, config: &ScopeConfig) -> Self {
        Self {
            registry: ContextualStorageRegistry::new("flow", bean_manager, true),
            windows: Mutex::new(EvictingLru::new(
                config.number_of_client_window_ids_in_session,
            )),
        }
    }

    /// The session's holder, created on first use. `None` once the session
    /// is invalidated.
    pub fn for_session(
        session: &Session,
        bean_manager: &Arc<dyn BeanManager>,
        config: &ScopeConfig,
    ) -> Option<Arc<Self>> {
        session.attach_with(|| Self::new(Arc::clone(bean_manager), config))
    }

    pub fn existing(session: &Session) -> Option<Arc<Self>> {
        session.get::<Self>()
    }

    /// Enter `flow` in the request's client window.
    ///
    /// The flow becomes the window's current flow and the window becomes the
    /// most recently used one, which may evict the oldest window.
    pub fn create_current_flow_scope(
        &self,
        ctx: &RequestContext,
        flow: &Flow,
    ) -> Result<Arc<ContextualStorage>, ScopeError> {
        let window = ctx.client_window_id().ok_or(ScopeError::MissingClientWindow)?;
        let flow_key = flow.client_window_flow_id(window);
        let storage = self
            .registry
            .get_contextual_storage(&flow_key, true)
            .ok_or(ScopeError::ContextNotActive("flow"))?;

        let evicted = {
            let mut windows = self.windows.lock();
            let (keys, evicted) = windows.get_or_insert_mut(window.to_string(), Vec::new);
            keys.retain(|k| k != &flow_key);
            keys.insert(0, flow_key.clone());
            evicted
        };
        if let Some((evicted_window, flow_keys)) = evicted {
            destroy_window_flows(&self.registry, &evicted_window, flow_keys);
        }

        tracing::debug!(
            session = %ctx.session().id(),
            client_window = window,
            flow = %flow,
            "[vs-03] Entered flow"
        );
        Ok(storage)
    }

    /// Leave the current flow of the request's client window.
    ///
    /// Returns the destroyed flow-map key, or `None` if no flow was active.
    pub fn destroy_current_flow_scope(
        &self,
        ctx: &RequestContext,
    ) -> Result<Option<String>, ScopeError> {
        let window = ctx.client_window_id().ok_or(ScopeError::MissingClientWindow)?;
        let flow_key = {
            let mut windows = self.windows.lock();
            match windows.get_mut(&window.to_string()) {
                Some(keys) if !keys.is_empty() => keys.remove(0),
                _ => return Ok(None),
            }
        };

        self.registry.destroy_scope(&flow_key)?;
        tracing::info!(
            session = %ctx.session().id(),
            client_window = window,
            flow_key = %flow_key,
            "[vs-03] Left flow"
        );
        Ok(Some(flow_key))
    }

    /// Active flow-map keys of `client_window`, newest first.
    pub fn get_active_flow_map_keys(&self, client_window: &str) -> Vec<String> {
        self.windows
            .lock()
            .peek(&client_window.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Mark `client_window` as recently used. Returns `false` if unknown.
    pub fn refresh_client_window(&self, client_window: &str) -> bool {
        self.windows.lock().touch(&client_window.to_string())
    }

    /// Storage of the request window's current flow.
    pub fn current_flow_storage(&self, ctx: &RequestContext) -> Option<Arc<ContextualStorage>> {
        let window = ctx.client_window_id()?;
        let flow_key = self.get_active_flow_map_keys(window).into_iter().next()?;
        self.registry.get_contextual_storage(&flow_key, false)
    }

    pub fn get_contextual_storage(
        &self,
        flow_key: &str,
        create_if_absent: bool,
    ) -> Option<Arc<ContextualStorage>> {
        self.registry.get_contextual_storage(flow_key, create_if_absent)
    }

    pub fn client_window_count(&self) -> usize {
        self.windows.lock().len()
    }

    /// Forget every window and destroy every flow storage.
    pub fn destroy_beans(&self) {
        let dropped = self.windows.lock().drain().len();
        self.registry.destroy_beans();
        tracing::debug!(client_windows = dropped, "[vs-03] Dropped flow windows");
    }
}

impl fmt::Debug for FlowScopeBeanHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowScopeBeanHolder")
            .field("registry", &self.registry)
            .field("client_windows", &self.client_window_count())
            .finish()
    }
}

fn destroy_window_flows(registry: &ContextualStorageRegistry, window: &str, flow_keys: Vec<String>) {
    let count = flow_keys.len();
    for flow_key in flow_keys {
        if let Err(e) = registry.destroy_scope(&flow_key) {
            tracing::warn!(
                client_window = window,
                flow_key = %flow_key,
                error = %e,
                "[vs-03] Flow teardown incomplete, continuing"
            );
        }
    }
    tracing::info!(client_window = window, flows = count, "[vs-03] Evicted client window");
}
