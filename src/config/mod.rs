//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → site::Site::compile (route trees)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the compiled trees never change
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ObservabilityConfig, RouteConfig, ServerConfig, SiteConfig, SubsiteConfig};
pub use validation::{validate_config, ValidationError};
