//! # Domain Layer
//!
//! Configuration, the bounded session collection, key factories and the
//! token payload types.

pub mod collection;
pub mod config;
pub mod entities;
pub mod errors;
pub mod key_factory;

pub use collection::{CollectionState, SerializedViewCollection};
pub use config::{
    params, ClientStateConfig, KeyStrategy, ServerStateConfig, StateConfig, StateSavingMethod,
};
pub use entities::{ClientStatePayload, CsrfToken, StoredView};
pub use errors::StateCacheError;
pub use key_factory::{
    key_factory, CounterKeyFactory, RandomKeyFactory, SequenceCounter, ViewKeyFactory,
};
