//! # Bean Model
//!
//! Instances are type-erased; beans are identified either by their
//! passivation id or by the identity of their definition.

use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::ports::Contextual;

/// A live scoped object.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Shared handle to a bean definition.
pub type ContextualRef = Arc<dyn Contextual>;

/// Key of an instance inside a storage.
#[derive(Clone)]
pub enum BeanKey {
    /// Serializable key used by passivation-capable storages.
    Passivation(String),
    /// Identity of the bean definition.
    Identity(ContextualRef),
}

impl BeanKey {
    fn identity_addr(bean: &ContextualRef) -> *const () {
        Arc::as_ptr(bean) as *const ()
    }
}

impl PartialEq for BeanKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BeanKey::Passivation(a), BeanKey::Passivation(b)) => a == b,
            (BeanKey::Identity(a), BeanKey::Identity(b)) => {
                Self::identity_addr(a) == Self::identity_addr(b)
            }
            _ => false,
        }
    }
}

impl Eq for BeanKey {}

impl Hash for BeanKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            BeanKey::Passivation(id) => {
                0u8.hash(state);
                id.hash(state);
            }
            BeanKey::Identity(bean) => {
                1u8.hash(state);
                (Self::identity_addr(bean) as usize).hash(state);
            }
        }
    }
}

impl fmt::Debug for BeanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeanKey::Passivation(id) => write!(f, "Passivation({id})"),
            BeanKey::Identity(bean) => write!(f, "Identity({:p})", Self::identity_addr(bean)),
        }
    }
}

impl fmt::Display for BeanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeanKey::Passivation(id) => f.write_str(id),
            BeanKey::Identity(bean) => write!(f, "{:p}", Self::identity_addr(bean)),
        }
    }
}

/// Dependent objects created alongside a scoped instance.
///
/// Released, newest first, when the owning instance is destroyed.
#[derive(Default)]
pub struct CreationalContext {
    dependents: Mutex<Vec<(ContextualRef, Instance)>>,
}

impl CreationalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Track a dependent instance for release.
    pub fn push_dependent(&self, bean: ContextualRef, instance: Instance) {
        self.dependents.lock().push((bean, instance));
    }

    pub fn dependent_count(&self) -> usize {
        self.dependents.lock().len()
    }

    /// Destroy every dependent. Returns how many destroy callbacks failed.
    pub fn release(&self) -> usize {
        let dependents = std::mem::take(&mut *self.dependents.lock());
        let mut failed = 0;
        for (bean, instance) in dependents.into_iter().rev() {
            let nested = CreationalContext::new();
            if let Err(e) = bean.destroy(instance, &nested) {
                tracing::warn!(error = %e, "[vs-03] Dependent destroy failed");
                failed += 1;
            }
        }
        failed
    }
}

impl fmt::Debug for CreationalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreationalContext")
            .field("dependents", &self.dependent_count())
            .finish()
    }
}
