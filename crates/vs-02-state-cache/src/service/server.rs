//! # Server-Side State Cache
//!
//! Views are parked in the session's [`SerializedViewCollection`]; the token
//! is the hex form of the view key, optionally sealed by the codec.

use shared_types::{RequestContext, SerializedView, SerializedViewKey, Session, ViewScopeProvider};
use std::sync::Arc;
use vs_01_state_codec::domain::compression::{compress_if_smaller, decompress_framed};
use vs_01_state_codec::domain::serialization;
use vs_01_state_codec::{CodecError, CompressionConfig, StateCodec, StateCodecApi, ZstdCompressor};

use crate::domain::{
    key_factory, SerializedViewCollection, ServerStateConfig, StateCacheError, StoredView,
    ViewKeyFactory,
};
use crate::ports::StateCache;

pub struct ServerSideStateCache {
    codec: Arc<StateCodec>,
    config: ServerStateConfig,
    key_factory: Box<dyn ViewKeyFactory>,
    provider: Option<Arc<dyn ViewScopeProvider>>,
    compressor: ZstdCompressor,
}

impl ServerSideStateCache {
    pub fn new(
        codec: Arc<StateCodec>,
        config: ServerStateConfig,
        provider: Option<Arc<dyn ViewScopeProvider>>,
    ) -> Self {
        let compressor = ZstdCompressor::new(CompressionConfig {
            level: codec.config().compression_level,
            enabled: config.compress_server_state_in_session,
        });
        Self {
            codec,
            key_factory: key_factory(config.key_strategy),
            config,
            provider,
            compressor,
        }
    }

    /// The session's collection, created on first use. `None` once the
    /// session is invalidated.
    pub fn collection(&self, session: &Session) -> Option<Arc<SerializedViewCollection>> {
        session.attach_with(|| {
            SerializedViewCollection::new(
                self.config.number_of_views_in_session,
                self.config.sequential_limit(),
            )
        })
    }

    fn store(&self, view: SerializedView) -> Result<StoredView, StateCacheError> {
        if !self.config.serialize_state_in_session {
            return Ok(StoredView::Live(Arc::new(view)));
        }
        let bytes = serialization::to_bytes(&view)?;
        let framed = compress_if_smaller(&self.compressor, &bytes).map_err(CodecError::from)?;
        Ok(StoredView::Serialized(framed))
    }

    fn load(&self, stored: StoredView) -> Result<Arc<SerializedView>, StateCacheError> {
        match stored {
            StoredView::Live(view) => Ok(view),
            StoredView::Serialized(framed) => {
                let bytes = decompress_framed(&self.compressor, &framed).map_err(CodecError::from)?;
                Ok(Arc::new(serialization::from_bytes(&bytes)?))
            }
        }
    }

    fn encode_key(&self, key: &SerializedViewKey) -> Result<String, StateCacheError> {
        if self.config.encrypt_server_token {
            Ok(self.codec.construct(&key.to_bytes())?)
        } else {
            Ok(key.to_hex())
        }
    }

    fn decode_key(&self, token: &str) -> Result<SerializedViewKey, StateCacheError> {
        if self.config.encrypt_server_token {
            let bytes = self.codec.reconstruct(token)?;
            Ok(SerializedViewKey::from_bytes(&bytes)?)
        } else {
            Ok(SerializedViewKey::from_hex(token.trim())?)
        }
    }
}

impl StateCache for ServerSideStateCache {
    fn save_serialized_view(
        &self,
        ctx: &mut RequestContext,
        view: SerializedView,
    ) -> Result<String, StateCacheError> {
        let session = Arc::clone(ctx.session());
        let invalidated = || StateCacheError::SessionInvalidated(session.id().to_string());
        let collection = self.collection(&session).ok_or_else(invalidated)?;
        let key = self.key_factory.next_key(&session, view.view_id());
        let view_id = view.view_id().to_string();
        let stored = self.store(view)?;

        collection.put(
            &session,
            key,
            stored,
            ctx.restored_view_key().copied(),
            ctx.view_scope_id(),
            self.provider.as_deref(),
        );
        if !session.is_valid() {
            return Err(invalidated());
        }

        tracing::debug!(
            session = %session.id(),
            view_id = %view_id,
            views = collection.len(),
            "[vs-02] Saved view in session"
        );
        self.encode_key(&key)
    }

    fn restore_serialized_view(
        &self,
        ctx: &mut RequestContext,
        view_id: &str,
        token: &str,
    ) -> Result<Option<Arc<SerializedView>>, StateCacheError> {
        let key = self.decode_key(token)?;
        if !key.matches_view(view_id) {
            tracing::debug!(view_id, "[vs-02] Session token belongs to another view");
            return Ok(None);
        }
        if !ctx.session().is_valid() {
            return Ok(None);
        }

        let Some(collection) = ctx.session().get::<SerializedViewCollection>() else {
            return Ok(None);
        };
        let Some(stored) = collection.get(&key) else {
            tracing::debug!(view_id, "[vs-02] Saved view no longer in session");
            return Ok(None);
        };

        let view = self.load(stored)?;
        if view.view_id() != view_id {
            return Ok(None);
        }

        ctx.set_restored_view_key(Some(key));
        Ok(Some(view))
    }
}
