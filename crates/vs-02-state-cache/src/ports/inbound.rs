//! Inbound (Driving) ports for the state cache.

use shared_types::{RequestContext, SerializedView};
use std::sync::Arc;

use crate::domain::StateCacheError;
use crate::service::csrf;

/// Saves a view at the end of a request and restores it on postback.
///
/// Implementations must satisfy the round-trip law: restoring the token
/// returned by a save, in the same session and for the same view id, yields
/// an equal view until it expires.
pub trait StateCache: Send + Sync {
    /// Persist `view` and return the token to embed in the page.
    fn save_serialized_view(
        &self,
        ctx: &mut RequestContext,
        view: SerializedView,
    ) -> Result<String, StateCacheError>;

    /// Restore the view saved under `token`.
    ///
    /// Returns `Ok(None)` when the token is unknown, expired, evicted or was
    /// issued for a different view.
    fn restore_serialized_view(
        &self,
        ctx: &mut RequestContext,
        view_id: &str,
        token: &str,
    ) -> Result<Option<Arc<SerializedView>>, StateCacheError>;

    /// Per-session anti-forgery token.
    fn create_cryptographically_strong_token_from_session(&self, ctx: &RequestContext) -> String {
        csrf::session_token(ctx.session())
    }
}
