//! # Session Context
//!
//! The per-session object that owns every session-bound registry (the
//! serialized-view collection, the view and flow bean holders, the CSRF
//! token). Registries are stored in a typed [`Extensions`] map so subsystems
//! can attach their own state without this crate knowing their types.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Opaque HTTP session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random session id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// EXTENSIONS
// =============================================================================

type Slot = Arc<dyn Any + Send + Sync>;

/// Type-keyed map holding at most one value per type.
#[derive(Default)]
pub struct Extensions {
    slots: DashMap<TypeId, Slot>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of type `T`, creating it with `init` if absent.
    ///
    /// Creation is atomic: concurrent callers observe a single instance.
    /// `init` runs while the slot's shard is locked and must not touch this map.
    pub fn get_or_insert_with<T, F>(&self, init: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let slot = self
            .slots
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(init()) as Slot);
        match Arc::clone(slot.value()).downcast::<T>() {
            Ok(value) => value,
            Err(_) => unreachable!("extension slot keyed by TypeId holds a foreign type"),
        }
    }

    /// Get the value of type `T` if present.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| Arc::clone(slot.value()).downcast::<T>().ok())
    }

    /// Remove and return the value of type `T`.
    pub fn remove<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.slots
            .remove(&TypeId::of::<T>())
            .and_then(|(_, slot)| slot.downcast::<T>().ok())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&self) {
        self.slots.clear();
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.slots.len())
            .finish()
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// One browser session.
///
/// Shared across the concurrent requests of that session via `Arc`.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    extensions: Extensions,
    invalidated: AtomicBool,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            extensions: Extensions::new(),
            invalidated: AtomicBool::new(false),
        }
    }

    /// New session with a random id, wrapped for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new(SessionId::generate()))
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Shorthand for [`Extensions::get_or_insert_with`].
    pub fn get_or_insert_with<T, F>(&self, init: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        self.extensions.get_or_insert_with(init)
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with), but never
    /// attaches anything to an invalidated session.
    ///
    /// Validity is checked again after the insert. If the session was
    /// invalidated in between, the freshly attached value is detached and
    /// `None` is returned.
    pub fn attach_with<T, F>(&self, init: F) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        if !self.is_valid() {
            return None;
        }
        let value = self.extensions.get_or_insert_with(init);
        if !self.is_valid() {
            self.extensions.remove::<T>();
            return None;
        }
        Some(value)
    }

    /// Shorthand for [`Extensions::get`].
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.extensions.get()
    }

    pub fn is_valid(&self) -> bool {
        !self.invalidated.load(Ordering::Acquire)
    }

    /// Mark the session invalid.
    ///
    /// Returns `false` if it already was. Registries stay attached so the
    /// owner can tear them down; [`attach_with`](Self::attach_with) refuses
    /// new ones from here on. Call [`Extensions::clear`] when done.
    pub fn invalidate(&self) -> bool {
        !self.invalidated.swap(true, Ordering::AcqRel)
    }
}
