//! # Shared Types Crate
//!
//! Types shared by the view-state subsystems:
//!
//! - `entities` - `SerializedView` and `SerializedViewKey`
//! - `session` - per-session context object with a typed extension map
//! - `context` - per-request context handed to every state/scope operation
//! - `ports` - `ViewScopeProvider` and `TimeSource` collaborator traits
//! - `config` - string-valued parameter lookup shared by all config sections
//! - `errors` - errors crossing subsystem boundaries
//!
//! ## Design Principles
//!
//! - **Explicit context**: session-bound registries hang off a [`Session`]
//!   value passed to every operation, never an ambient singleton.
//! - **Opaque state**: the component tree is never interpreted here; views are
//!   carried as bytes keyed by component id.

pub mod config;
pub mod context;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod session;

pub use config::{parse_param, ConfigError, ConfigLookup};
pub use context::RequestContext;
pub use entities::*;
pub use errors::*;
pub use ports::{ManualTimeSource, SystemTimeSource, TimeSource, ViewScopeProvider};
pub use session::{Extensions, Session, SessionId};
