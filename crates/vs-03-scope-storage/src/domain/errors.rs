//! # Domain Errors

use shared_types::ScopeLifecycleError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The storage was destroyed and may not be used again.
    #[error("Contextual storage {0} is no longer active")]
    InactiveStorage(String),

    /// A stored key no longer resolves to a bean.
    #[error("No bean registered for key {0}")]
    UnknownBean(String),

    /// A destroy callback failed.
    #[error(transparent)]
    Lifecycle(#[from] ScopeLifecycleError),

    /// Passivation-capable storage got a bean without a passivation id.
    #[error("Bean {0} has no passivation id")]
    NotPassivationCapable(String),

    /// No current scope for this request.
    #[error("No active {0} scope for the current request")]
    ContextNotActive(&'static str),

    /// Flow operations need a client window id.
    #[error("Request has no client window id")]
    MissingClientWindow,

    /// Flow definition is incomplete or inconsistent.
    #[error("Invalid flow definition: {0}")]
    InvalidFlow(String),
}
