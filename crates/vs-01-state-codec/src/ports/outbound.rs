//! Outbound (Driven) ports for the state codec.

use shared_types::SerializedView;

use crate::domain::{serialization, CodecError};

/// Turns a view into bytes and back.
///
/// The default adapter uses bincode; deployments that need a different
/// wire format for component state can plug in their own.
pub trait ViewStateSerializer: Send + Sync {
    fn serialize(&self, view: &SerializedView) -> Result<Vec<u8>, CodecError>;

    fn deserialize(&self, bytes: &[u8]) -> Result<SerializedView, CodecError>;
}

/// Bincode-backed [`ViewStateSerializer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeViewStateSerializer;

impl ViewStateSerializer for BincodeViewStateSerializer {
    fn serialize(&self, view: &SerializedView) -> Result<Vec<u8>, CodecError> {
        serialization::to_bytes(view)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<SerializedView, CodecError> {
        serialization::from_bytes(bytes)
    }
}
