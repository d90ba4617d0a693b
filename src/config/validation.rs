//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (mounts reference existing sub-sites)
//! - Check pattern syntax and wildcard placement per node kind
//! - Detect duplicate sibling names and cyclic sub-site mounts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{parse_method, RouteConfig, RouteKind, SiteConfig};
use crate::routing::{CustomParser, ParamType, Pattern, PatternError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("enum `{0}` has no values")]
    EmptyEnum(String),

    #[error("enum `{0}` shadows a built-in parameter type")]
    EnumShadowsBuiltin(String),

    #[error("{route}: {source}")]
    InvalidPattern { route: String, source: PatternError },

    #[error("{route}: wildcard not allowed in a parent or mount prefix")]
    WildcardInPrefix { route: String },

    #[error("{scope}: route with empty name")]
    EmptyName { scope: String },

    #[error("{scope}: duplicate route name `{name}`")]
    DuplicateName { scope: String, name: String },

    #[error("{route}: invalid method `{method}`")]
    InvalidMethod { route: String, method: String },

    #[error("{route}: a mount cannot declare children")]
    MountWithChildren { route: String },

    #[error("{route}: a mount cannot restrict methods")]
    MountWithMethods { route: String },

    #[error("{route}: a parent cannot restrict methods; declare them on its children")]
    ParentWithMethods { route: String },

    #[error("{route}: unknown sub-site `{subsite}`")]
    UnknownSubsite { route: String, subsite: String },

    #[error("sub-site `{0}` mounts itself, directly or indirectly")]
    SubsiteCycle(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for (name, words) in &config.enums {
        if words.is_empty() {
            errors.push(ValidationError::EmptyEnum(name.clone()));
        }
        if ParamType::from_name(name).is_some() {
            errors.push(ValidationError::EnumShadowsBuiltin(name.clone()));
        }
    }

    let custom = config.custom_parsers();
    validate_routes(config, "routes", &config.routes, &custom, &mut errors);
    for (name, subsite) in &config.subsites {
        let scope = format!("subsites.{}", name);
        validate_routes(config, &scope, &subsite.routes, &custom, &mut errors);
    }

    errors.extend(find_cycles(config).into_iter().map(ValidationError::SubsiteCycle));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(
    config: &SiteConfig,
    scope: &str,
    routes: &[RouteConfig],
    custom: &[CustomParser],
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();

    for route in routes {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyName { scope: scope.to_string() });
        } else if !seen.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName {
                scope: scope.to_string(),
                name: route.name.clone(),
            });
        }

        let path = format!("{}.{}", scope, route.name);
        let kind = route.kind();

        match Pattern::parse_with(&route.pattern, custom) {
            Ok(pattern) if kind != RouteKind::Leaf && pattern.has_wildcard() => {
                errors.push(ValidationError::WildcardInPrefix { route: path.clone() });
            }
            Ok(_) => {}
            Err(source) => errors.push(ValidationError::InvalidPattern {
                route: path.clone(),
                source,
            }),
        }

        for method in &route.methods {
            if parse_method(method).is_none() {
                errors.push(ValidationError::InvalidMethod {
                    route: path.clone(),
                    method: method.clone(),
                });
            }
        }

        match kind {
            RouteKind::Mount(subsite) => {
                if !route.children.is_empty() {
                    errors.push(ValidationError::MountWithChildren { route: path.clone() });
                }
                if !route.methods.is_empty() {
                    errors.push(ValidationError::MountWithMethods { route: path.clone() });
                }
                if !config.subsites.contains_key(subsite) {
                    errors.push(ValidationError::UnknownSubsite {
                        route: path.clone(),
                        subsite: subsite.to_string(),
                    });
                }
            }
            RouteKind::Parent => {
                if !route.methods.is_empty() {
                    errors.push(ValidationError::ParentWithMethods { route: path.clone() });
                }
                validate_routes(config, &path, &route.children, custom, errors);
            }
            RouteKind::Leaf => {}
        }
    }
}

/// Names of sub-sites that take part in a mount cycle.
fn find_cycles(config: &SiteConfig) -> Vec<String> {
    let edges: BTreeMap<&str, Vec<&str>> = config
        .subsites
        .iter()
        .map(|(name, subsite)| {
            let mut mounts = Vec::new();
            collect_mounts(&subsite.routes, &mut mounts);
            (name.as_str(), mounts)
        })
        .collect();

    edges
        .keys()
        .filter(|start| reaches(&edges, start, start))
        .map(|name| name.to_string())
        .collect()
}

fn collect_mounts<'a>(routes: &'a [RouteConfig], out: &mut Vec<&'a str>) {
    for route in routes {
        match route.kind() {
            RouteKind::Mount(subsite) => out.push(subsite),
            RouteKind::Parent => collect_mounts(&route.children, out),
            RouteKind::Leaf => {}
        }
    }
}

fn reaches(edges: &BTreeMap<&str, Vec<&str>>, from: &str, target: &str) -> bool {
    let mut stack: Vec<&str> = edges.get(from).cloned().unwrap_or_default();
    let mut visited = HashSet::new();

    while let Some(node) = stack.pop() {
        if node == target {
            return true;
        }
        if visited.insert(node) {
            if let Some(next) = edges.get(node) {
                stack.extend(next.iter().copied());
            }
        }
    }
    false
}
