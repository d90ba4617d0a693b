//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign and propagate request ID)
//!     → site (resolve path + method)
//!     → 200 JSON route / 405 / 404
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{HttpServer, RouteResponse};
