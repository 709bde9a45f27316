//! # Contextual Storage
//!
//! Instances of one scope (one view, one flow). Lifecycle:
//!
//! ```text
//! absent ──create──→ active ──deactivate──→ inactive (terminal)
//! ```
//!
//! Once inactive, lookups behave as if the storage did not exist and no
//! instance can be created in it.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::ScopeLifecycleError;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::bean::{BeanKey, ContextualRef, CreationalContext, Instance};
use super::errors::ScopeError;
use crate::ports::BeanManager;

/// An instance together with the context it was created in.
#[derive(Clone)]
pub struct ContextualInstanceInfo {
    pub instance: Instance,
    pub creational_context: Arc<CreationalContext>,
}

impl fmt::Debug for ContextualInstanceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextualInstanceInfo")
            .field("creational_context", &self.creational_context)
            .finish_non_exhaustive()
    }
}

pub struct ContextualStorage {
    id: String,
    instances: DashMap<BeanKey, ContextualInstanceInfo>,
    bean_manager: Arc<dyn BeanManager>,
    passivation_capable: bool,
    active: AtomicBool,
}

impl ContextualStorage {
    pub fn new(
        id: impl Into<String>,
        bean_manager: Arc<dyn BeanManager>,
        passivation_capable: bool,
    ) -> Self {
        Self {
            id: id.into(),
            instances: DashMap::new(),
            bean_manager,
            passivation_capable,
            active: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_passivation_capable(&self) -> bool {
        self.passivation_capable
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Mark inactive. Returns `false` if it already was.
    pub fn deactivate(&self) -> bool {
        self.active.swap(false, Ordering::AcqRel)
    }

    /// Key under which `bean`'s instance is stored here.
    pub fn bean_key(&self, bean: &ContextualRef) -> Result<BeanKey, ScopeError> {
        if !self.passivation_capable {
            return Ok(BeanKey::Identity(Arc::clone(bean)));
        }
        bean.passivation_id()
            .map(|id| BeanKey::Passivation(id.to_string()))
            .ok_or_else(|| ScopeError::NotPassivationCapable(self.id.clone()))
    }

    /// Create and store an instance of `bean`.
    ///
    /// The bean is constructed outside any map lock. If another request
    /// stored an instance first, that one is returned and ours is destroyed.
    pub fn create_contextual_instance(
        &self,
        bean: &ContextualRef,
        creational_context: Arc<CreationalContext>,
    ) -> Result<Instance, ScopeError> {
        if !self.is_active() {
            return Err(ScopeError::InactiveStorage(self.id.clone()));
        }
        let key = self.bean_key(bean)?;
        if let Some(existing) = self.get(&key) {
            return Ok(existing);
        }

        let instance = bean.create(&creational_context);
        let winner = match self.instances.entry(key.clone()) {
            Entry::Occupied(entry) => Some(Arc::clone(&entry.get().instance)),
            Entry::Vacant(entry) => {
                entry.insert(ContextualInstanceInfo {
                    instance: Arc::clone(&instance),
                    creational_context: Arc::clone(&creational_context),
                });
                None
            }
        };

        match winner {
            Some(existing) => {
                if let Err(e) = bean.destroy(instance, &creational_context) {
                    tracing::warn!(bean = %key, error = %e, "[vs-03] Discarding duplicate instance failed");
                }
                creational_context.release();
                Ok(existing)
            }
            None => {
                tracing::debug!(storage = %self.id, bean = %key, "[vs-03] Created contextual instance");
                Ok(instance)
            }
        }
    }

    /// Stored instance for `key`, if any.
    pub fn get(&self, key: &BeanKey) -> Option<Instance> {
        if !self.is_active() {
            return None;
        }
        self.instances
            .get(key)
            .map(|info| Arc::clone(&info.value().instance))
    }

    pub fn get_info(&self, key: &BeanKey) -> Option<ContextualInstanceInfo> {
        if !self.is_active() {
            return None;
        }
        self.instances.get(key).map(|info| info.value().clone())
    }

    pub fn contains(&self, key: &BeanKey) -> bool {
        self.is_active() && self.instances.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Resolve the bean behind a stored key.
    pub fn get_bean(&self, key: &BeanKey) -> Result<ContextualRef, ScopeError> {
        match key {
            BeanKey::Identity(bean) => Ok(Arc::clone(bean)),
            BeanKey::Passivation(id) => self
                .bean_manager
                .passivation_capable_bean(id)
                .ok_or_else(|| ScopeError::UnknownBean(id.clone())),
        }
    }

    /// Destroy every stored instance with its original creational context.
    ///
    /// Keeps going past failures; returns the number destroyed, or
    /// `PartialDestroy` if any callback failed.
    pub fn destroy_all_active(&self) -> Result<usize, ScopeLifecycleError> {
        let keys: Vec<BeanKey> = self.instances.iter().map(|e| e.key().clone()).collect();
        let total = keys.len();
        let mut failed = 0;

        for key in keys {
            let Some((key, info)) = self.instances.remove(&key) else {
                continue;
            };
            let bean = match self.get_bean(&key) {
                Ok(bean) => bean,
                Err(e) => {
                    tracing::warn!(storage = %self.id, error = %e, "[vs-03] Cannot destroy instance");
                    failed += 1;
                    continue;
                }
            };
            if let Err(e) = bean.destroy(info.instance, &info.creational_context) {
                tracing::warn!(storage = %self.id, bean = %key, error = %e, "[vs-03] Destroy callback failed");
                failed += 1;
            }
            info.creational_context.release();
        }

        if failed > 0 {
            return Err(ScopeLifecycleError::PartialDestroy {
                scope_id: self.id.clone(),
                failed,
                total,
            });
        }
        Ok(total)
    }
}

impl fmt::Debug for ContextualStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextualStorage")
            .field("id", &self.id)
            .field("instances", &self.instances.len())
            .field("passivation_capable", &self.passivation_capable)
            .field("active", &self.is_active())
            .finish()
    }
}
