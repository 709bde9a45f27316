//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::SerializedView;
use std::sync::Arc;

/// Payload carried inside a client-side token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStatePayload {
    pub view: SerializedView,
    pub view_id_hash: u32,
    /// Milliseconds since the Unix epoch at save time.
    pub timestamp_ms: u64,
}

/// A view as parked in session storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredView {
    /// The view object itself.
    Live(Arc<SerializedView>),
    /// Framed bincode bytes, possibly zstd-compressed.
    Serialized(Vec<u8>),
}

impl StoredView {
    pub fn is_serialized(&self) -> bool {
        matches!(self, StoredView::Serialized(_))
    }
}

/// Per-session anti-forgery token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(pub String);
