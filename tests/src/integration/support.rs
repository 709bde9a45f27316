//! # Test Fixtures

use parking_lot::Mutex;
use shared_types::{RequestContext, ScopeLifecycleError, Session};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vs_03_scope_storage::{BeanManager, Contextual, ContextualRef, CreationalContext, Instance};

/// Install a test-friendly subscriber once; `RUST_LOG` overrides the filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Passivation-capable bean whose instances are labelled strings.
pub struct RecordingBean {
    id: String,
    created: AtomicUsize,
    destroyed: Mutex<Vec<String>>,
}

impl RecordingBean {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            created: AtomicUsize::new(0),
            destroyed: Mutex::new(Vec::new()),
        })
    }

    pub fn handle(self: &Arc<Self>) -> ContextualRef {
        Arc::clone(self) as ContextualRef
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().clone()
    }
}

impl Contextual for RecordingBean {
    fn create(&self, _creational: &CreationalContext) -> Instance {
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Arc::new(format!("{}#{}", self.id, n))
    }

    fn destroy(
        &self,
        instance: Instance,
        _creational: &CreationalContext,
    ) -> Result<(), ScopeLifecycleError> {
        self.destroyed.lock().push(label(&instance));
        Ok(())
    }

    fn passivation_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

pub fn label(instance: &Instance) -> String {
    (**instance)
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_default()
}

#[derive(Default)]
pub struct Beans {
    beans: HashMap<String, ContextualRef>,
}

impl Beans {
    pub fn of(beans: &[&Arc<RecordingBean>]) -> Arc<dyn BeanManager> {
        let beans = beans
            .iter()
            .map(|bean| (bean.id.clone(), bean.handle()))
            .collect();
        Arc::new(Self { beans })
    }
}

impl BeanManager for Beans {
    fn passivation_capable_bean(&self, id: &str) -> Option<ContextualRef> {
        self.beans.get(id).cloned()
    }
}

pub fn request(session: &Arc<Session>, view_id: &str) -> RequestContext {
    RequestContext::new(Arc::clone(session)).with_view_id(view_id)
}
