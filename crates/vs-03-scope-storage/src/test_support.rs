//! Beans and bean managers shared by the unit tests.

use parking_lot::Mutex;
use shared_types::ScopeLifecycleError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::{ContextualRef, CreationalContext, Instance};
use crate::ports::{BeanManager, Contextual};

type DestroyHook = Box<dyn Fn() + Send + Sync>;

/// Bean whose instances are serial numbers.
#[derive(Default)]
pub(crate) struct TestBean {
    passivation_id: Option<String>,
    fail_destroy: bool,
    on_destroy: Option<DestroyHook>,
    created: AtomicUsize,
    destroyed: Mutex<Vec<usize>>,
}

impl TestBean {
    pub(crate) fn passivating(id: &str) -> Arc<Self> {
        Arc::new(Self {
            passivation_id: Some(id.to_string()),
            ..Self::default()
        })
    }

    pub(crate) fn identity() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing(id: &str) -> Arc<Self> {
        Arc::new(Self {
            passivation_id: Some(id.to_string()),
            fail_destroy: true,
            ..Self::default()
        })
    }

    /// Passivating bean that runs `hook` from its destroy callback.
    pub(crate) fn with_destroy_hook(id: &str, hook: impl Fn() + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            passivation_id: Some(id.to_string()),
            on_destroy: Some(Box::new(hook)),
            ..Self::default()
        })
    }

    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub(crate) fn destroyed(&self) -> Vec<usize> {
        self.destroyed.lock().clone()
    }
}

impl Contextual for TestBean {
    fn create(&self, _creational: &CreationalContext) -> Instance {
        let serial = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Arc::new(serial)
    }

    fn destroy(
        &self,
        instance: Instance,
        _creational: &CreationalContext,
    ) -> Result<(), ScopeLifecycleError> {
        if let Some(hook) = &self.on_destroy {
            hook();
        }
        self.destroyed.lock().push(serial(&instance));
        if self.fail_destroy {
            return Err(ScopeLifecycleError::DestroyFailed {
                bean: self.passivation_id.clone().unwrap_or_default(),
                reason: "refused".into(),
            });
        }
        Ok(())
    }

    fn passivation_id(&self) -> Option<&str> {
        self.passivation_id.as_deref()
    }
}

pub(crate) fn serial(instance: &Instance) -> usize {
    (**instance).downcast_ref::<usize>().copied().unwrap_or(0)
}

pub(crate) fn bean_ref(bean: &Arc<TestBean>) -> ContextualRef {
    Arc::clone(bean) as ContextualRef
}

#[derive(Default)]
pub(crate) struct TestBeanManager {
    beans: HashMap<String, ContextualRef>,
}

impl TestBeanManager {
    pub(crate) fn with(beans: &[&Arc<TestBean>]) -> Arc<Self> {
        let beans = beans
            .iter()
            .filter_map(|bean| {
                bean.passivation_id
                    .clone()
                    .map(|id| (id, bean_ref(bean)))
            })
            .collect();
        Arc::new(Self { beans })
    }
}

impl BeanManager for TestBeanManager {
    fn passivation_capable_bean(&self, id: &str) -> Option<ContextualRef> {
        self.beans.get(id).cloned()
    }
}
