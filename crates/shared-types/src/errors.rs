//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// A view key could not be parsed from a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyDecodeError {
    /// Token is not valid hex.
    #[error("Invalid hex in view key: {0}")]
    Hex(String),

    /// Decoded key has an impossible length.
    #[error("Invalid view key length: {actual} bytes")]
    Length { actual: usize },
}

/// Failures while tearing down scoped instances.
///
/// Destruction is best effort: callers log these and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeLifecycleError {
    /// A bean's destroy callback reported a failure.
    #[error("Destroy callback failed for bean {bean}: {reason}")]
    DestroyFailed { bean: String, reason: String },

    /// Some instances of a scope could not be destroyed.
    #[error("{failed} of {total} contextual instances failed to destroy in scope {scope_id}")]
    PartialDestroy {
        scope_id: String,
        failed: usize,
        total: usize,
    },
}
