//! # Client-Side State Cache
//!
//! The whole view travels in the token; nothing is kept on the server.

use shared_types::{view_id_hash, RequestContext, SerializedView, TimeSource};
use std::sync::Arc;
use vs_01_state_codec::StateCodec;

use crate::domain::{ClientStateConfig, ClientStatePayload, StateCacheError};
use crate::ports::StateCache;

pub struct ClientSideStateCache {
    codec: Arc<StateCodec>,
    config: ClientStateConfig,
    time: Arc<dyn TimeSource>,
}

impl ClientSideStateCache {
    pub fn new(codec: Arc<StateCodec>, config: ClientStateConfig, time: Arc<dyn TimeSource>) -> Self {
        Self {
            codec,
            config,
            time,
        }
    }

    fn expired(&self, timestamp_ms: u64) -> bool {
        match self.config.timeout_millis() {
            Some(timeout) => self.time.now_millis().saturating_sub(timestamp_ms) > timeout,
            None => false,
        }
    }
}

impl StateCache for ClientSideStateCache {
    fn save_serialized_view(
        &self,
        _ctx: &mut RequestContext,
        view: SerializedView,
    ) -> Result<String, StateCacheError> {
        let payload = ClientStatePayload {
            view_id_hash: view.view_id_hash(),
            timestamp_ms: self.time.now_millis(),
            view,
        };
        let token = self.codec.construct_value(&payload)?;
        tracing::debug!(
            view_id = %payload.view.view_id(),
            token_len = token.len(),
            "[vs-02] Saved view in client token"
        );
        Ok(token)
    }

    fn restore_serialized_view(
        &self,
        _ctx: &mut RequestContext,
        view_id: &str,
        token: &str,
    ) -> Result<Option<Arc<SerializedView>>, StateCacheError> {
        let payload: ClientStatePayload = self.codec.reconstruct_value(token)?;

        if payload.view_id_hash != view_id_hash(view_id) {
            tracing::debug!(view_id, "[vs-02] Client token belongs to another view");
            return Ok(None);
        }
        if self.expired(payload.timestamp_ms) {
            tracing::debug!(
                view_id,
                saved_at = payload.timestamp_ms,
                "[vs-02] Client token expired"
            );
            return Ok(None);
        }

        Ok(Some(Arc::new(payload.view)))
    }
}
