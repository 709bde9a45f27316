//! # State Cache Service
//!
//! Entry point for the request lifecycle. Picks the client-side or
//! server-side strategy from `VS_STATE_SAVING_METHOD` and owns the shared
//! codec.

mod client;
pub mod csrf;
mod server;


pub use client::ClientSideStateCache;
pub use server::ServerSideStateCache;

use shared_types::{
    ConfigError, RequestContext, SerializedView, Session, SystemTimeSource, TimeSource,
    ViewScopeProvider,
};
use std::sync::Arc;
use vs_01_state_codec::StateCodec;

use crate::domain::{SerializedViewCollection, StateCacheError, StateConfig, StateSavingMethod};
use crate::ports::StateCache;

pub struct StateCacheService {
    method: StateSavingMethod,
    codec: Arc<StateCodec>,
    cache: Box<dyn StateCache>,
    provider: Option<Arc<dyn ViewScopeProvider>>,
}

impl StateCacheService {
    /// Build the service for `config`.
    ///
    /// `provider` receives view-scope teardown when saved views are evicted.
    pub fn new(
        config: StateConfig,
        provider: Option<Arc<dyn ViewScopeProvider>>,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let codec = Arc::new(StateCodec::new(config.codec.clone())?);

        let cache: Box<dyn StateCache> = match config.state_saving_method {
            StateSavingMethod::Client => Box::new(ClientSideStateCache::new(
                Arc::clone(&codec),
                config.client.clone(),
                time,
            )),
            StateSavingMethod::Server => Box::new(ServerSideStateCache::new(
                Arc::clone(&codec),
                config.server.clone(),
                provider.clone(),
            )),
        };

        tracing::info!(
            method = %config.state_saving_method,
            views_in_session = config.server.number_of_views_in_session,
            "[vs-02] State cache initialized"
        );

        Ok(Self {
            method: config.state_saving_method,
            codec,
            cache,
            provider,
        })
    }

    /// Build from `VS_*` environment variables with the system clock.
    pub fn from_env(provider: Option<Arc<dyn ViewScopeProvider>>) -> Result<Self, ConfigError> {
        Self::new(StateConfig::from_env()?, provider, Arc::new(SystemTimeSource))
    }

    pub fn state_saving_method(&self) -> StateSavingMethod {
        self.method
    }

    pub fn is_client_side(&self) -> bool {
        self.method == StateSavingMethod::Client
    }

    /// Shared codec, also used for other opaque tokens.
    pub fn codec(&self) -> &Arc<StateCodec> {
        &self.codec
    }

    /// Invalidate a session, then tear down its saved views and view scopes.
    ///
    /// Requests still running against the session can no longer attach a
    /// collection or register a view scope once this starts.
    pub fn session_destroyed(&self, session: &Session) {
        if !session.invalidate() {
            return;
        }
        if let Some(collection) = session.get::<SerializedViewCollection>() {
            collection.clear(session, self.provider.as_deref());
        }
        if let Some(provider) = &self.provider {
            provider.on_session_destroyed(session);
        }
        session.extensions().clear();
        tracing::info!(session = %session.id(), "[vs-02] Session invalidated");
    }
}

impl StateCache for StateCacheService {
    fn save_serialized_view(
        &self,
        ctx: &mut RequestContext,
        view: SerializedView,
    ) -> Result<String, StateCacheError> {
        self.cache.save_serialized_view(ctx, view)
    }

    fn restore_serialized_view(
        &self,
        ctx: &mut RequestContext,
        view_id: &str,
        token: &str,
    ) -> Result<Option<Arc<SerializedView>>, StateCacheError> {
        self.cache.restore_serialized_view(ctx, view_id, token)
    }
}
