//! # Serialized View Collection
//!
//! Bounded per-session store of saved views.
//!
//! ## Bounds
//!
//! - at most `N` entries in total, trimmed from the oldest insertion
//! - at most `M` entries per back-navigation chain, where each save made
//!   after a restore links the new key to the restored one
//!
//! Chain trimming runs before total trimming. A view scope is destroyed when
//! the last entry referencing it is evicted; destruction happens while the
//! collection lock is held so a concurrent save cannot re-reference a scope
//! that is being torn down.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared_types::{SerializedViewKey, Session, ViewScopeProvider};
use std::collections::{HashMap, HashSet, VecDeque};

use super::entities::StoredView;


/// Collection contents, detached from the lock.
///
/// This is what gets written when a session is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionState {
    /// Insertion order, oldest first.
    keys: VecDeque<SerializedViewKey>,
    views: HashMap<SerializedViewKey, StoredView>,
    /// key -> key it was restored from
    precedence: HashMap<SerializedViewKey, SerializedViewKey>,
    view_scope_ids: HashMap<SerializedViewKey, String>,
    scope_refcounts: HashMap<String, usize>,
}

impl CollectionState {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in insertion order, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &SerializedViewKey> {
        self.keys.iter()
    }

    fn contains(&self, key: &SerializedViewKey) -> bool {
        self.views.contains_key(key)
    }

    fn register_scope(&mut self, key: SerializedViewKey, scope_id: &str, orphaned: &mut Vec<String>) {
        if self.view_scope_ids.get(&key).map(String::as_str) == Some(scope_id) {
            return;
        }
        if let Some(previous) = self.view_scope_ids.insert(key, scope_id.to_string()) {
            self.release_scope(previous, orphaned);
        }
        *self.scope_refcounts.entry(scope_id.to_string()).or_insert(0) += 1;
    }

    fn release_scope(&mut self, scope_id: String, orphaned: &mut Vec<String>) {
        let remaining = match self.scope_refcounts.get_mut(&scope_id) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => return,
        };
        if remaining == 0 {
            self.scope_refcounts.remove(&scope_id);
            orphaned.push(scope_id);
        }
    }

    fn remove_entry(&mut self, key: &SerializedViewKey, orphaned: &mut Vec<String>) -> bool {
        if self.views.remove(key).is_none() {
            return false;
        }
        self.keys.retain(|k| k != key);
        self.precedence.remove(key);
        self.precedence.retain(|_, previous| previous != key);
        if let Some(scope_id) = self.view_scope_ids.remove(key) {
            self.release_scope(scope_id, orphaned);
        }
        true
    }

    /// Cut the chain ending at `key` down to `limit` entries.
    fn trim_chain(
        &mut self,
        key: SerializedViewKey,
        limit: usize,
        evicted: &mut Vec<SerializedViewKey>,
        orphaned: &mut Vec<String>,
    ) {
        let mut reached = self.precedence.get(&key).copied();
        let mut count = 1;
        while let Some(current) = reached {
            if count >= limit {
                break;
            }
            reached = self.precedence.get(&current).copied();
            count += 1;
        }

        let mut seen = HashSet::from([key]);
        while let Some(victim) = reached {
            if !seen.insert(victim) {
                break;
            }
            reached = self.precedence.get(&victim).copied();
            if self.remove_entry(&victim, orphaned) {
                evicted.push(victim);
            }
        }
    }

    fn trim_total(
        &mut self,
        limit: usize,
        evicted: &mut Vec<SerializedViewKey>,
        orphaned: &mut Vec<String>,
    ) {
        while self.keys.len() > limit {
            let Some(oldest) = self.keys.front().copied() else {
                break;
            };
            if self.remove_entry(&oldest, orphaned) {
                evicted.push(oldest);
            } else {
                self.keys.pop_front();
            }
        }
    }
}

/// Thread-safe, bounded collection of saved views for one session.
#[derive(Debug)]
pub struct SerializedViewCollection {
    max_views: usize,
    max_sequential: Option<usize>,
    state: Mutex<CollectionState>,
}

impl SerializedViewCollection {
    /// `max_views` is clamped to at least 1; a sequential limit of 0 means none.
    pub fn new(max_views: usize, max_sequential: Option<usize>) -> Self {
        Self::from_state(max_views, max_sequential, CollectionState::default())
    }

    /// Rebuild a collection from persisted contents.
    pub fn from_state(
        max_views: usize,
        max_sequential: Option<usize>,
        state: CollectionState,
    ) -> Self {
        Self {
            max_views: max_views.max(1),
            max_sequential: max_sequential.filter(|m| *m > 0),
            state: Mutex::new(state),
        }
    }

    /// Store `view` under `key` and apply the bounds.
    ///
    /// Returns the keys evicted by this call. Does nothing once `session` is
    /// invalidated, so a save racing session teardown cannot register a view
    /// scope after [`clear`](Self::clear) ran.
    pub fn put(
        &self,
        session: &Session,
        key: SerializedViewKey,
        view: StoredView,
        previous_key: Option<SerializedViewKey>,
        view_scope_id: Option<&str>,
        provider: Option<&dyn ViewScopeProvider>,
    ) -> Vec<SerializedViewKey> {
        let mut state = self.state.lock();
        if !session.is_valid() {
            return Vec::new();
        }
        let mut evicted = Vec::new();
        let mut orphaned = Vec::new();

        if state.contains(&key) {
            state.keys.retain(|k| k != &key);
        }
        state.keys.push_back(key);
        state.views.insert(key, view);

        if let Some(scope_id) = view_scope_id {
            state.register_scope(key, scope_id, &mut orphaned);
        }

        if let (Some(previous), Some(limit)) = (previous_key, self.max_sequential) {
            if previous != key && state.contains(&previous) {
                state.precedence.insert(key, previous);
                state.trim_chain(key, limit, &mut evicted, &mut orphaned);
            }
        }

        state.trim_total(self.max_views, &mut evicted, &mut orphaned);

        if !evicted.is_empty() {
            tracing::debug!(
                session = %session.id(),
                evicted = evicted.len(),
                remaining = state.len(),
                "[vs-02] Evicted saved views"
            );
        }
        destroy_scopes(session, provider, orphaned);
        evicted
    }

    /// Look up a saved view. Does not change eviction order.
    pub fn get(&self, key: &SerializedViewKey) -> Option<StoredView> {
        self.state.lock().views.get(key).cloned()
    }

    pub fn contains(&self, key: &SerializedViewKey) -> bool {
        self.state.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    /// Live references to `view_scope_id`.
    pub fn scope_references(&self, view_scope_id: &str) -> usize {
        self.state
            .lock()
            .scope_refcounts
            .get(view_scope_id)
            .copied()
            .unwrap_or(0)
    }

    /// Drop every entry and destroy every referenced view scope.
    pub fn clear(&self, session: &Session, provider: Option<&dyn ViewScopeProvider>) {
        let mut state = self.state.lock();
        let scopes: Vec<String> = state.scope_refcounts.keys().cloned().collect();
        let dropped = state.len();
        *state = CollectionState::default();

        tracing::debug!(session = %session.id(), dropped, "[vs-02] Cleared saved views");
        destroy_scopes(session, provider, scopes);
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> CollectionState {
        self.state.lock().clone()
    }
}

fn destroy_scopes(session: &Session, provider: Option<&dyn ViewScopeProvider>, scopes: Vec<String>) {
    let Some(provider) = provider else {
        return;
    };
    for scope_id in scopes {
        match provider.destroy_view_scope_map(session, &scope_id) {
            Ok(()) => tracing::info!(
                session = %session.id(),
                view_scope_id = %scope_id,
                "[vs-02] Destroyed view scope of evicted views"
            ),
            Err(e) => tracing::warn!(
                session = %session.id(),
                view_scope_id = %scope_id,
                error = %e,
                "[vs-02] Failed to destroy view scope, continuing"
            ),
        }
    }
}
