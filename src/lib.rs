//! Typed route parsing and dispatch.
//!
//! A route tree of static segments, typed captures, wildcards, nested
//! parents and mounted sub-sites, interpreted at runtime into a total
//! function from path segments to route values.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod site;
pub mod testing;

pub use config::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Dispatch, PathRequest, RouteTree};
pub use site::{RouteValue, Site};
