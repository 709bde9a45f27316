//! # Domain Layer
//!
//! - `bean` - instance and bean-key model
//! - `storage` - one scope's instances
//! - `registry` - scope id to storage map for one session
//! - `lru` - bounded map that returns what it evicts
//! - `flow` - flow definitions
//! - `config` - scope settings
//! - `errors` - domain errors

pub mod bean;
pub mod config;
pub mod errors;
pub mod flow;
pub mod lru;
pub mod registry;
pub mod storage;


pub use bean::{BeanKey, ContextualRef, CreationalContext, Instance};
pub use config::{ScopeConfig, DEFAULT_CLIENT_WINDOWS_IN_SESSION};
pub use errors::ScopeError;
pub use flow::{Flow, FlowBuilder};
pub use lru::EvictingLru;
pub use registry::{random_scope_id, ContextualStorageRegistry};
pub use storage::{ContextualInstanceInfo, ContextualStorage};
