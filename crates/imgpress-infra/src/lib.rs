//! imgpress Infrastructure Library
//!
//! Shared infrastructure for the gateway binary:
//! - Middleware (request ID)
//! - Telemetry initialization

pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};
