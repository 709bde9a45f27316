//! # Collaborator Ports
//!
//! Interfaces the view-state core requires from the host framework.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::ScopeLifecycleError;
use crate::session::Session;

/// Lifecycle of view-scope maps, keyed by view-scope id.
///
/// The state cache calls `destroy_view_scope_map` when the last saved view
/// referencing a view scope is evicted.
pub trait ViewScopeProvider: Send + Sync {
    /// Draw a view-scope id not in use in `session`.
    fn generate_view_scope_id(&self, session: &Session) -> String;

    /// Create the storage backing `view_scope_id`.
    fn create_view_scope_map(&self, session: &Session, view_scope_id: &str);

    /// Reattach to an existing view scope. Returns `false` if it is gone.
    fn restore_view_scope_map(&self, session: &Session, view_scope_id: &str) -> bool;

    /// Destroy every instance living in `view_scope_id`.
    ///
    /// Called while the session's saved-view collection is locked. Bean
    /// destroy callbacks reached from here must not save or restore views in
    /// the same session; that would wait on the lock this call holds.
    fn destroy_view_scope_map(
        &self,
        session: &Session,
        view_scope_id: &str,
    ) -> Result<(), ScopeLifecycleError>;

    /// Tear down all view scopes of an expiring session.
    fn on_session_destroyed(&self, session: &Session);
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Default time source using system time.
#[derive(Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually advanced clock for tests.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now: AtomicU64,
}

impl ManualTimeSource {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
