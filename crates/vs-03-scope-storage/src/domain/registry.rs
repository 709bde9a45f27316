//! # Contextual Storage Registry
//!
//! `scope id -> ContextualStorage` for one session and one scope type.
//!
//! Lookups clone the current map handle under a short read lock and then
//! work lock-free on the concurrent map. `destroy_beans` publishes a fresh
//! empty map first and tears down the detached one afterwards, so bean
//! destroy callbacks never run under a registry-wide lock.

use dashmap::DashMap;
use parking_lot::RwLock;
use rand::Rng;
use shared_types::ScopeLifecycleError;
use std::fmt;
use std::sync::Arc;

use super::storage::ContextualStorage;
use crate::ports::BeanManager;

type StorageMap = DashMap<String, Arc<ContextualStorage>>;

/// A random scope id candidate.
pub fn random_scope_id() -> String {
    rand::thread_rng().gen::<u32>().to_string()
}

pub struct ContextualStorageRegistry {
    scope: &'static str,
    storages: RwLock<Arc<StorageMap>>,
    bean_manager: Arc<dyn BeanManager>,
    passivation_capable: bool,
}

impl ContextualStorageRegistry {
    /// `scope` names the scope type in log output.
    pub fn new(
        scope: &'static str,
        bean_manager: Arc<dyn BeanManager>,
        passivation_capable: bool,
    ) -> Self {
        Self {
            scope,
            storages: RwLock::new(Arc::new(DashMap::new())),
            bean_manager,
            passivation_capable,
        }
    }

    fn map(&self) -> Arc<StorageMap> {
        Arc::clone(&self.storages.read())
    }

    fn new_storage(&self, id: &str) -> Arc<ContextualStorage> {
        Arc::new(ContextualStorage::new(
            id,
            Arc::clone(&self.bean_manager),
            self.passivation_capable,
        ))
    }

    /// Storage for `id`, optionally creating it.
    ///
    /// An inactive storage is never returned: it is replaced when
    /// `create_if_absent` is set and dropped otherwise. A storage created
    /// while `destroy_beans` runs lands in the fresh map, never the detached
    /// one.
    pub fn get_contextual_storage(
        &self,
        id: &str,
        create_if_absent: bool,
    ) -> Option<Arc<ContextualStorage>> {
        let map = self.map();

        if !create_if_absent {
            let found = map.get(id).map(|entry| Arc::clone(entry.value()))?;
            if found.is_active() {
                return Some(found);
            }
            map.remove_if(id, |_, storage| !storage.is_active());
            return None;
        }

        let mut map = map;
        loop {
            let storage = {
                let mut entry = map
                    .entry(id.to_string())
                    .or_insert_with(|| self.new_storage(id));
                if !entry.is_active() {
                    *entry = self.new_storage(id);
                }
                Arc::clone(entry.value())
            };
            let current = self.map();
            if Arc::ptr_eq(&map, &current) {
                return Some(storage);
            }
            // `destroy_beans` detached `map` while we were inserting into it.
            if let Some((_, stale)) = map.remove_if(id, |_, s| Arc::ptr_eq(s, &storage)) {
                self.teardown(&stale);
            }
            map = current;
        }
    }

    fn teardown(&self, storage: &ContextualStorage) {
        if let Err(e) = storage.destroy_all_active() {
            tracing::warn!(scope = self.scope, error = %e, "[vs-03] Scope teardown incomplete");
        }
        storage.deactivate();
    }

    /// Draw random ids until one is not in use.
    pub fn generate_unique_scope_id(&self) -> String {
        self.generate_unique_scope_id_with(random_scope_id)
    }

    /// As [`generate_unique_scope_id`](Self::generate_unique_scope_id) with a
    /// caller-supplied candidate source.
    pub fn generate_unique_scope_id_with<F>(&self, mut candidate: F) -> String
    where
        F: FnMut() -> String,
    {
        let map = self.map();
        loop {
            let id = candidate();
            if !map.contains_key(&id) {
                return id;
            }
        }
    }

    /// Remove and destroy one storage. Returns `Ok(false)` if it was absent.
    pub fn destroy_scope(&self, id: &str) -> Result<bool, ScopeLifecycleError> {
        let Some((_, storage)) = self.map().remove(id) else {
            return Ok(false);
        };
        let result = storage.destroy_all_active();
        storage.deactivate();
        match result {
            Ok(destroyed) => {
                tracing::info!(scope = self.scope, scope_id = id, destroyed, "[vs-03] Destroyed scope");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// Destroy every storage.
    ///
    /// Failures are logged and do not stop the remaining teardown.
    pub fn destroy_beans(&self) {
        let detached = {
            let mut guard = self.storages.write();
            std::mem::replace(&mut *guard, Arc::new(DashMap::new()))
        };

        let storages: Vec<Arc<ContextualStorage>> = detached
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        detached.clear();

        let count = storages.len();
        for storage in storages {
            self.teardown(&storage);
        }
        if count > 0 {
            tracing::info!(scope = self.scope, storages = count, "[vs-03] Destroyed all scopes");
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    pub fn scope_ids(&self) -> Vec<String> {
        self.map().iter().map(|entry| entry.key().clone()).collect()
    }
}

impl fmt::Debug for ContextualStorageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextualStorageRegistry")
            .field("scope", &self.scope)
            .field("storages", &self.len())
            .finish()
    }
}
