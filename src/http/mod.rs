//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, route dispatch)
//!     → request.rs (target extraction, body capture, header hygiene)
//!     → [outbound call via shared client]
//!     → response.rs (status/header/body relay, error mapping)
//!     → Send to caller
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use response::RelayError;
pub use server::HttpServer;
