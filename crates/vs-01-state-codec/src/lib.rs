//! # View-State Codec
//!
//! **Subsystem ID:** vs-01
//!
//! ## Purpose
//!
//! Turns view state into opaque, tamper-evident tokens and back. Used by the
//! client-side cache for whole views and by the server-side cache for its
//! session tokens.
//!
//! ## Token Properties
//!
//! | Property | Enforcement |
//! |----------|-------------|
//! | Round-trip | `reconstruct(construct(x)) == x` under a fixed configuration |
//! | Tamper-evident | HMAC-SHA256 verified before decryption; any flipped bit is `CodecError::Integrity` |
//! | Transport-safe | URL-safe base64 without padding |
//! | Bounded decode | bincode size limit and 32 MiB decompression cap |
//!
//! ## Configuration
//!
//! | Parameter | Default |
//! |-----------|---------|
//! | `VS_USE_ENCRYPTION` | `true` |
//! | `VS_COMPRESS_STATE_IN_CLIENT` | `false` |
//! | `VS_ALGORITHM` | `AES` |
//! | `VS_ALGORITHM_PARAMETERS` | `GCM/NoPadding` |
//! | `VS_ALGORITHM_IV` | unset (required for `GCM/FixedField`) |
//! | `VS_SECRET`, `VS_MAC_SECRET` | unset (random when `VS_SECRET_CACHE` is on) |
//! | `VS_SECRET_CACHE` | `true` |
//!
//! ## Module Structure
//!
//! ```text
//! ports/inbound.rs   - StateCodecApi
//! ports/outbound.rs  - ViewStateSerializer (+ bincode adapter)
//! service.rs         - StateCodec
//! domain/            - config, keys, compression, encoding, serialization, errors
//! ```

pub mod domain;
pub mod ports;
pub mod service;


pub use domain::*;
pub use ports::*;
pub use service::StateCodec;
