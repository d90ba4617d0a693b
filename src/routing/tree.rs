//! Route tree data model.
//!
//! # Responsibilities
//! - Represent leaves, nested parents and sub-site mounts as a closed sum type
//! - Reject malformed trees at construction time
//! - Erase the route type of nested children behind the parent's wrap function
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc`, no locks)
//! - Parents and mounts share one type-erased child seam (`Nested`)
//! - Constructors returning `None` behave like a segment that failed to parse

use std::collections::HashSet;
use std::fmt;

use axum::http::Method;
use thiserror::Error;

use crate::routing::dispatch::Dispatch;
use crate::routing::pattern::Pattern;
use crate::routing::piece::Captures;
use crate::routing::subsite::Subsite;

/// Construction-time tree errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("resource name must not be empty")]
    EmptyName,

    #[error("duplicate resource name `{0}`")]
    DuplicateName(String),

    #[error("wildcard in `{0}` is not the final piece")]
    WildcardNotFinal(String),

    #[error("prefix of `{0}` contains a wildcard; nested resources would be unreachable")]
    WildcardInPrefix(String),
}

type Constructor<R> = Box<dyn Fn(Captures) -> Option<R> + Send + Sync>;

/// A terminal resource.
pub struct Leaf<R> {
    name: String,
    pattern: Pattern,
    methods: Vec<Method>,
    construct: Constructor<R>,
}

impl<R> Leaf<R> {
    /// Create a leaf accepting any method.
    pub fn new<F>(name: impl Into<String>, pattern: Pattern, construct: F) -> Self
    where
        F: Fn(Captures) -> Option<R> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            pattern,
            methods: Vec::new(),
            construct: Box::new(construct),
        }
    }

    /// Restrict the leaf to the given methods. An empty set accepts any.
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn allowed_methods(&self) -> &[Method] {
        &self.methods
    }

    /// Whether a request with `method` has a handler here.
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    pub(crate) fn construct(&self, bound: Captures) -> Option<R> {
        (self.construct)(bound)
    }
}

/// Type-erased dispatch into whatever sits below a parent or mount.
pub(crate) trait Nested<R>: Send + Sync {
    fn dispatch(&self, bound: Captures, rest: &[String], method: Option<&Method>) -> Dispatch<R>;
}

struct NestedTree<C, F> {
    tree: RouteTree<C>,
    wrap: F,
}

impl<C, R, F> Nested<R> for NestedTree<C, F>
where
    F: Fn(Captures, C) -> Option<R> + Send + Sync,
{
    fn dispatch(&self, bound: Captures, rest: &[String], method: Option<&Method>) -> Dispatch<R> {
        match self.tree.dispatch(rest, method) {
            Dispatch::Matched { route, method_ok } => match (self.wrap)(bound, route) {
                Some(route) => Dispatch::Matched { route, method_ok },
                None => Dispatch::NotFound,
            },
            Dispatch::NotFound => Dispatch::NotFound,
        }
    }
}

struct Delegate<S, F> {
    subsite: S,
    lift: F,
}

impl<S, R, F> Nested<R> for Delegate<S, F>
where
    S: Subsite,
    F: Fn(Captures, S::Route) -> Option<R> + Send + Sync,
{
    fn dispatch(&self, bound: Captures, rest: &[String], method: Option<&Method>) -> Dispatch<R> {
        self.subsite
            .parse_subroute(rest, method)
            .and_then(|sub| (self.lift)(bound, sub))
            .map_or(Dispatch::NotFound, |route| Dispatch::Matched { route, method_ok: true })
    }
}

/// A prefix with its own nested resources.
pub struct Parent<R> {
    name: String,
    prefix: Pattern,
    children: Box<dyn Nested<R>>,
}

impl<R> Parent<R> {
    /// `wrap` receives the prefix captures and the child's route value.
    pub fn new<C, F>(name: impl Into<String>, prefix: Pattern, children: RouteTree<C>, wrap: F) -> Self
    where
        C: 'static,
        R: 'static,
        F: Fn(Captures, C) -> Option<R> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            prefix,
            children: Box::new(NestedTree { tree: children, wrap }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &Pattern {
        &self.prefix
    }

    pub(crate) fn children(&self) -> &dyn Nested<R> {
        self.children.as_ref()
    }
}

/// A prefix delegating everything below it to a sub-site.
pub struct Mount<R> {
    name: String,
    prefix: Pattern,
    subsite: Box<dyn Nested<R>>,
}

impl<R> Mount<R> {
    /// `lift` wraps the sub-site's route value into the parent's route type.
    pub fn new<S, F>(name: impl Into<String>, prefix: Pattern, subsite: S, lift: F) -> Self
    where
        S: Subsite + 'static,
        R: 'static,
        F: Fn(Captures, S::Route) -> Option<R> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            prefix,
            subsite: Box::new(Delegate { subsite, lift }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &Pattern {
        &self.prefix
    }

    pub(crate) fn subsite(&self) -> &dyn Nested<R> {
        self.subsite.as_ref()
    }
}

/// One node of a route tree.
pub enum RouteNode<R> {
    Leaf(Leaf<R>),
    Parent(Parent<R>),
    Mount(Mount<R>),
}

impl<R> RouteNode<R> {
    pub fn name(&self) -> &str {
        match self {
            RouteNode::Leaf(leaf) => leaf.name(),
            RouteNode::Parent(parent) => parent.name(),
            RouteNode::Mount(mount) => mount.name(),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        match self {
            RouteNode::Leaf(leaf) => leaf.pattern(),
            RouteNode::Parent(parent) => parent.prefix(),
            RouteNode::Mount(mount) => mount.prefix(),
        }
    }

    fn validate(&self) -> Result<(), TreeError> {
        if self.name().is_empty() {
            return Err(TreeError::EmptyName);
        }
        match self {
            RouteNode::Leaf(leaf) if leaf.pattern.has_misplaced_wildcard() => {
                Err(TreeError::WildcardNotFinal(leaf.name.clone()))
            }
            RouteNode::Parent(_) | RouteNode::Mount(_) if self.pattern().has_wildcard() => {
                Err(TreeError::WildcardInPrefix(self.name().to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl<R> From<Leaf<R>> for RouteNode<R> {
    fn from(leaf: Leaf<R>) -> Self {
        RouteNode::Leaf(leaf)
    }
}

impl<R> From<Parent<R>> for RouteNode<R> {
    fn from(parent: Parent<R>) -> Self {
        RouteNode::Parent(parent)
    }
}

impl<R> From<Mount<R>> for RouteNode<R> {
    fn from(mount: Mount<R>) -> Self {
        RouteNode::Mount(mount)
    }
}

impl<R> fmt::Debug for RouteNode<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteNode::Leaf(leaf) => f
                .debug_struct("Leaf")
                .field("name", &leaf.name)
                .field("pattern", &leaf.pattern.to_string())
                .field("methods", &leaf.methods)
                .finish(),
            RouteNode::Parent(parent) => f
                .debug_struct("Parent")
                .field("name", &parent.name)
                .field("prefix", &parent.prefix.to_string())
                .finish_non_exhaustive(),
            RouteNode::Mount(mount) => f
                .debug_struct("Mount")
                .field("name", &mount.name)
                .field("prefix", &mount.prefix.to_string())
                .finish_non_exhaustive(),
        }
    }
}

/// An ordered, validated, immutable list of sibling nodes.
pub struct RouteTree<R> {
    nodes: Vec<RouteNode<R>>,
}

impl<R> RouteTree<R> {
    /// Validate and freeze the given siblings, in declaration order.
    pub fn new<I>(nodes: I) -> Result<Self, TreeError>
    where
        I: IntoIterator,
        I::Item: Into<RouteNode<R>>,
    {
        let nodes: Vec<RouteNode<R>> = nodes.into_iter().map(Into::into).collect();

        let mut seen = HashSet::new();
        for node in &nodes {
            node.validate()?;
            if !seen.insert(node.name()) {
                return Err(TreeError::DuplicateName(node.name().to_string()));
            }
        }

        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[RouteNode<R>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<R> fmt::Debug for RouteTree<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.nodes).finish()
    }
}
