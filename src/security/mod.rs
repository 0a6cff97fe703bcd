//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_key.rs (optional shared secret, query `key` or `x-api-key`)
//!     → Pass to route handlers
//! ```
//!
//! # Design Decisions
//! - Fail closed: a configured secret rejects every request that does not present it
//! - The secret comes from configuration at construction, never from the environment at call time

pub mod access_key;

pub use access_key::{access_key_middleware, AccessKeyState, API_KEY_HEADER};
