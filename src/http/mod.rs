//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, tracing span)
//!     → security (access key gate)
//!     → handlers.rs
//!         /         → home form
//!         /proxy    → proxy core
//!         /_health  → liveness
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, GatewayServer};
