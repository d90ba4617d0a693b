//! Resource dispatch over a route tree.
//!
//! # Responsibilities
//! - Try sibling nodes in declaration order
//! - Resolve method filtering on leaves
//! - Recurse into parents, delegate to mounted sub-sites
//!
//! # Design Decisions
//! - First syntactic match wins; a method mismatch still ends the search
//! - A parent whose children all miss falls through to its next sibling
//! - A mount commits once its prefix matches, whatever the sub-site answers
//! - Absence of a method means "do not filter"

use axum::http::Method;

use crate::routing::request::PathRequest;
use crate::routing::tree::{RouteNode, RouteTree};

/// Outcome of dispatching a segment list through a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<R> {
    /// The path matched `route`. `method_ok` is false when the leaf exists
    /// but does not accept the request method (405 rather than 404).
    Matched { route: R, method_ok: bool },
    NotFound,
}

impl<R> Dispatch<R> {
    /// Collapse to a route, treating a method rejection as no match.
    pub fn into_route(self) -> Option<R> {
        match self {
            Dispatch::Matched { route, method_ok: true } => Some(route),
            _ => None,
        }
    }

    pub fn is_method_rejected(&self) -> bool {
        matches!(self, Dispatch::Matched { method_ok: false, .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Dispatch::NotFound)
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Dispatch::Matched { method_ok: true, .. } => "matched",
            Dispatch::Matched { method_ok: false, .. } => "method_rejected",
            Dispatch::NotFound => "not_found",
        }
    }

    pub fn map<T, F>(self, f: F) -> Dispatch<T>
    where
        F: FnOnce(R) -> T,
    {
        match self {
            Dispatch::Matched { route, method_ok } => Dispatch::Matched {
                route: f(route),
                method_ok,
            },
            Dispatch::NotFound => Dispatch::NotFound,
        }
    }
}

impl<R> RouteTree<R> {
    /// Dispatch `segments` through this level of the tree.
    pub fn dispatch(&self, segments: &[String], method: Option<&Method>) -> Dispatch<R> {
        for node in self.nodes() {
            match node {
                RouteNode::Leaf(leaf) => {
                    let Some(bound) = leaf.pattern().match_exact(segments) else {
                        continue;
                    };
                    let Some(route) = leaf.construct(bound) else {
                        continue;
                    };
                    let method_ok = method.map_or(true, |m| leaf.allows(m));
                    tracing::trace!(resource = leaf.name(), method_ok, "leaf matched");
                    return Dispatch::Matched { route, method_ok };
                }
                RouteNode::Parent(parent) => {
                    let Some(m) = parent.prefix().match_prefix(segments) else {
                        continue;
                    };
                    match parent.children().dispatch(m.bound, m.rest, method) {
                        Dispatch::NotFound => {
                            tracing::trace!(resource = parent.name(), "no child matched");
                        }
                        matched => return matched,
                    }
                }
                RouteNode::Mount(mount) => {
                    let Some(m) = mount.prefix().match_prefix(segments) else {
                        continue;
                    };
                    tracing::trace!(resource = mount.name(), rest = m.rest.len(), "delegating to sub-site");
                    return mount.subsite().dispatch(m.bound, m.rest, method);
                }
            }
        }
        Dispatch::NotFound
    }

    /// Resolve a request, keeping a method rejection distinguishable.
    pub fn resolve(&self, request: &PathRequest) -> Dispatch<R> {
        self.dispatch(request.segments(), request.method())
    }

    /// Parse a request into a route value.
    ///
    /// A path that matched a leaf not accepting the method yields `None`,
    /// the same as a path that matched nothing. Use [`RouteTree::resolve`]
    /// to tell the two apart.
    pub fn parse_route(&self, request: &PathRequest) -> Option<R> {
        self.resolve(request).into_route()
    }
}
