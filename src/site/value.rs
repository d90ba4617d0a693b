//! Route values produced by configured sites.

use serde::{Deserialize, Serialize};

use crate::routing::Capture;

/// One variant per node kind; nesting mirrors the configured tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteValue {
    /// A leaf resource and its captures.
    Resource { name: String, captures: Vec<Capture> },
    /// A parent's prefix captures and the matched child.
    Nested {
        name: String,
        captures: Vec<Capture>,
        child: Box<RouteValue>,
    },
    /// A mount's prefix captures and the sub-site's own route value.
    Subsite {
        name: String,
        captures: Vec<Capture>,
        route: Box<RouteValue>,
    },
}

impl RouteValue {
    pub fn resource(name: impl Into<String>, captures: Vec<Capture>) -> Self {
        RouteValue::Resource { name: name.into(), captures }
    }

    pub fn name(&self) -> &str {
        match self {
            RouteValue::Resource { name, .. }
            | RouteValue::Nested { name, .. }
            | RouteValue::Subsite { name, .. } => name,
        }
    }

    pub fn captures(&self) -> &[Capture] {
        match self {
            RouteValue::Resource { captures, .. }
            | RouteValue::Nested { captures, .. }
            | RouteValue::Subsite { captures, .. } => captures,
        }
    }

    /// The value one level down, if any.
    pub fn inner(&self) -> Option<&RouteValue> {
        match self {
            RouteValue::Resource { .. } => None,
            RouteValue::Nested { child, .. } => Some(child),
            RouteValue::Subsite { route, .. } => Some(route),
        }
    }

    /// Dotted names from the outermost node down to the leaf, e.g. `api.items.show`.
    pub fn qualified_name(&self) -> String {
        let mut names = vec![self.name()];
        let mut current = self;
        while let Some(inner) = current.inner() {
            names.push(inner.name());
            current = inner;
        }
        names.join(".")
    }
}
