//! # Core Domain Entities
//!
//! - **SerializedView**: snapshot of one rendered view's state
//! - **SerializedViewKey**: `(view_id_hash, sequence)` key into session storage

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::errors::KeyDecodeError;

/// Length of a random view-key sequence.
pub const RANDOM_SEQUENCE_LEN: usize = 16;

/// Hash of a view id as carried in state tokens.
///
/// Stable across processes so client tokens survive a restart.
pub fn view_id_hash(view_id: &str) -> u32 {
    let digest = Sha256::digest(view_id.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

// =============================================================================
// SERIALIZED VIEW
// =============================================================================

/// Snapshot of a view produced by the state-saving algorithm.
///
/// The tree structure and per-component state are opaque to this crate.
/// Created once per render pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedView {
    view_id: String,
    tree_structure: Option<Vec<u8>>,
    component_state: BTreeMap<String, Vec<u8>>,
}

impl SerializedView {
    /// Create an empty snapshot for `view_id`.
    pub fn new(view_id: impl Into<String>) -> Self {
        Self {
            view_id: view_id.into(),
            tree_structure: None,
            component_state: BTreeMap::new(),
        }
    }

    /// Attach the component structure tree.
    pub fn with_tree_structure(mut self, tree: Vec<u8>) -> Self {
        self.tree_structure = Some(tree);
        self
    }

    /// Attach the state of one component.
    pub fn with_component_state(mut self, client_id: impl Into<String>, state: Vec<u8>) -> Self {
        self.component_state.insert(client_id.into(), state);
        self
    }

    pub fn view_id(&self) -> &str {
        &self.view_id
    }

    pub fn tree_structure(&self) -> Option<&[u8]> {
        self.tree_structure.as_deref()
    }

    pub fn component_state(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.component_state
    }

    /// Hash of this snapshot's view id.
    pub fn view_id_hash(&self) -> u32 {
        view_id_hash(&self.view_id)
    }
}

// =============================================================================
// SERIALIZED VIEW KEY
// =============================================================================

/// Per-session discriminator of a saved view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKeySequence {
    /// Session counter value.
    Counter(u32),
    /// Unguessable random id.
    Random([u8; RANDOM_SEQUENCE_LEN]),
}

/// Key of a view parked in session storage.
///
/// Equality and hashing cover both the view-id hash and the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializedViewKey {
    view_id_hash: u32,
    sequence: ViewKeySequence,
}

impl SerializedViewKey {
    pub fn new(view_id_hash: u32, sequence: ViewKeySequence) -> Self {
        Self {
            view_id_hash,
            sequence,
        }
    }

    /// Counter-based key for `view_id`.
    pub fn counter(view_id: &str, sequence: u32) -> Self {
        Self::new(view_id_hash(view_id), ViewKeySequence::Counter(sequence))
    }

    pub fn view_id_hash(&self) -> u32 {
        self.view_id_hash
    }

    pub fn sequence(&self) -> ViewKeySequence {
        self.sequence
    }

    /// Whether this key was produced for `view_id`.
    pub fn matches_view(&self, view_id: &str) -> bool {
        self.view_id_hash == view_id_hash(view_id)
    }

    /// Compact binary form: 4-byte hash followed by the sequence bytes.
    ///
    /// The sequence variant is recovered from the total length.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + RANDOM_SEQUENCE_LEN);
        out.extend_from_slice(&self.view_id_hash.to_be_bytes());
        match self.sequence {
            ViewKeySequence::Counter(n) => out.extend_from_slice(&n.to_be_bytes()),
            ViewKeySequence::Random(bytes) => out.extend_from_slice(&bytes),
        }
        out
    }

    /// Parse the output of [`SerializedViewKey::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyDecodeError> {
        if bytes.len() < 4 {
            return Err(KeyDecodeError::Length { actual: bytes.len() });
        }
        let (hash, rest) = bytes.split_at(4);
        let view_id_hash = u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]]);
        let sequence = match rest.len() {
            4 => ViewKeySequence::Counter(u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]])),
            RANDOM_SEQUENCE_LEN => {
                let mut random = [0u8; RANDOM_SEQUENCE_LEN];
                random.copy_from_slice(rest);
                ViewKeySequence::Random(random)
            }
            _ => return Err(KeyDecodeError::Length { actual: bytes.len() }),
        };
        Ok(Self::new(view_id_hash, sequence))
    }

    /// Lowercase hex form used in plain server tokens.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse the output of [`SerializedViewKey::to_hex`].
    pub fn from_hex(token: &str) -> Result<Self, KeyDecodeError> {
        let bytes = hex::decode(token).map_err(|e| KeyDecodeError::Hex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_id_hash_is_stable() {
        assert_eq!(view_id_hash("/index.xhtml"), view_id_hash("/index.xhtml"));
        assert_ne!(view_id_hash("/view1.xhtml"), view_id_hash("/view2.xhtml"));
    }

    #[test]
    fn test_key_equality_covers_both_fields() {
        let a = SerializedViewKey::counter("/a.xhtml", 1);
        let b = SerializedViewKey::counter("/a.xhtml", 2);
        let c = SerializedViewKey::counter("/b.xhtml", 1);

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, SerializedViewKey::counter("/a.xhtml", 1));
    }

    #[test]
    fn test_counter_key_hex_form() {
        let key = SerializedViewKey::new(0x0102_0304, ViewKeySequence::Counter(0x1f));
        assert_eq!(key.to_hex(), "010203040000001f");
        assert_eq!(SerializedViewKey::from_hex("010203040000001f").unwrap(), key);
    }

    #[test]
    fn test_random_key_bytes() {
        let key = SerializedViewKey::new(7, ViewKeySequence::Random([0xAB; 16]));
        let bytes = key.to_bytes();
        assert_eq!(bytes.len(), 20);
        assert_eq!(SerializedViewKey::from_bytes(&bytes).unwrap(), key);
    }

    #[test]
    fn test_malformed_key_rejected() {
        assert!(SerializedViewKey::from_bytes(&[1, 2, 3]).is_err());
        assert!(SerializedViewKey::from_bytes(&[0; 9]).is_err());
        assert!(SerializedViewKey::from_hex("zz").is_err());
    }

    #[test]
    fn test_matches_view() {
        let key = SerializedViewKey::counter("/view1.xhtml", 3);
        assert!(key.matches_view("/view1.xhtml"));
        assert!(!key.matches_view("/view2.xhtml"));
    }

    #[test]
    fn test_serialized_view_bincode() {
        let view = SerializedView::new("/page.xhtml")
            .with_tree_structure(vec![1, 2, 3])
            .with_component_state("form:name", b"Ada".to_vec());

        let bytes = bincode::serialize(&view).unwrap();
        let back: SerializedView = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, view);
        assert_eq!(back.component_state().len(), 1);
    }
}
