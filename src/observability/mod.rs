//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (dispatch counters and latency)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows from the HTTP layer into every log line of a request
//! - Metrics are cheap (atomic increments) and a no-op until a recorder is installed

pub mod logging;
pub mod metrics;
