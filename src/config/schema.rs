//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a routed site.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::routing::CustomParser;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Enumerated segment types, usable as `{name:<enum>}` in patterns.
    pub enums: BTreeMap<String, Vec<String>>,

    /// Top-level route tree, in match order.
    pub routes: Vec<RouteConfig>,

    /// Named sub-sites that routes may mount.
    pub subsites: BTreeMap<String, SubsiteConfig>,
}

impl SiteConfig {
    /// Segment parsers for the declared enums.
    pub fn custom_parsers(&self) -> Vec<CustomParser> {
        self.enums
            .iter()
            .map(|(name, words)| CustomParser::one_of(name.clone(), words.iter().cloned()))
            .collect()
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// One node of the route tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Resource name, unique among its siblings.
    pub name: String,

    /// Path pattern, e.g. `/users/{id:int}`. A prefix for parents and mounts.
    pub pattern: String,

    /// Accepted methods; empty accepts any.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Nested resources. Non-empty makes this node a parent.
    #[serde(default)]
    pub children: Vec<RouteConfig>,

    /// Name of a sub-site to mount below the pattern.
    #[serde(default)]
    pub mount: Option<String>,
}

/// What a configured route compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind<'a> {
    Leaf,
    Parent,
    Mount(&'a str),
}

impl RouteConfig {
    pub fn kind(&self) -> RouteKind<'_> {
        match (&self.mount, self.children.is_empty()) {
            (Some(subsite), _) => RouteKind::Mount(subsite),
            (None, false) => RouteKind::Parent,
            (None, true) => RouteKind::Leaf,
        }
    }
}

/// A named, separately compiled route tree.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SubsiteConfig {
    pub routes: Vec<RouteConfig>,
}

/// Parse a configured method token. Tokens are case-insensitive here.
pub fn parse_method(token: &str) -> Option<Method> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Method::from_bytes(token.to_ascii_uppercase().as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.observability.log_level, "info");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_route_kinds() {
        let config: SiteConfig = toml::from_str(
            r#"
            [[routes]]
            name = "home"
            pattern = "/"

            [[routes]]
            name = "users"
            pattern = "/users"
              [[routes.children]]
              name = "show"
              pattern = "/{id:int}"

            [[routes]]
            name = "api"
            pattern = "/api"
            mount = "api"
            "#,
        )
        .unwrap();
        let kinds: Vec<_> = config.routes.iter().map(RouteConfig::kind).collect();
        assert_eq!(kinds, vec![RouteKind::Leaf, RouteKind::Parent, RouteKind::Mount("api")]);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("get"), Some(Method::GET));
        assert_eq!(parse_method(" DELETE "), Some(Method::DELETE));
        assert_eq!(parse_method("PURGE").map(|m| m.to_string()), Some("PURGE".to_string()));
        assert_eq!(parse_method(""), None);
        assert_eq!(parse_method("BAD METHOD"), None);
    }
}
