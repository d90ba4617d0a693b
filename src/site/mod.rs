//! Configured sites.
//!
//! # Data Flow
//! ```text
//! SiteConfig (validated)
//!     → Compiler (patterns, methods, nested trees, shared sub-sites)
//!     → RouteTree<RouteValue> + RenderTable
//!     → Site (immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Each sub-site is compiled once and mounted by `Arc`, however often it is used
//! - Rendering walks the same patterns the tree was compiled from

mod render;
mod value;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::{parse_method, RouteConfig, RouteKind, SiteConfig};
use crate::routing::{
    CustomParser, Dispatch, Leaf, Mount, Parent, PathRequest, Pattern, PatternError, RouteNode,
    RouteTree, TreeError,
};

use self::render::{join_segments, RenderTable};
pub use self::value::RouteValue;

/// Errors compiling a configuration into route trees.
///
/// A configuration that passed `validate_config` compiles without error.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("{route}: {source}")]
    Pattern { route: String, source: PatternError },

    #[error("{route}: invalid method `{method}`")]
    Method { route: String, method: String },

    #[error("{route}: unknown sub-site `{subsite}`")]
    UnknownSubsite { route: String, subsite: String },

    #[error("sub-site `{0}` mounts itself")]
    Cycle(String),

    #[error("{scope}: {source}")]
    Tree { scope: String, source: TreeError },
}

/// A compiled, immutable site.
#[derive(Debug)]
pub struct Site {
    tree: RouteTree<RouteValue>,
    renderer: RenderTable,
}

impl Site {
    /// Compile the configured route tree and its sub-sites.
    pub fn compile(config: &SiteConfig) -> Result<Self, SiteError> {
        let mut compiler = Compiler {
            config,
            custom: config.custom_parsers(),
            compiled: HashMap::new(),
            in_progress: HashSet::new(),
        };
        let (tree, renderer) = compiler.routes("routes", &config.routes)?;

        tracing::debug!(
            routes = tree.len(),
            subsites = compiler.compiled.len(),
            "Site compiled"
        );
        Ok(Self { tree, renderer })
    }

    pub fn tree(&self) -> &RouteTree<RouteValue> {
        &self.tree
    }

    /// Resolve a request, keeping method rejections distinguishable.
    pub fn resolve(&self, request: &PathRequest) -> Dispatch<RouteValue> {
        self.tree.resolve(request)
    }

    /// Parse a request into a route value; method rejections count as no match.
    pub fn parse_route(&self, request: &PathRequest) -> Option<RouteValue> {
        self.tree.parse_route(request)
    }

    /// Render a route value back into a percent-encoded path.
    pub fn render(&self, value: &RouteValue) -> Option<String> {
        let mut segments = Vec::new();
        self.renderer.render(value, &mut segments)?;
        Some(join_segments(&segments))
    }
}

type Compiled = (Arc<RouteTree<RouteValue>>, Arc<RenderTable>);

struct Compiler<'a> {
    config: &'a SiteConfig,
    custom: Vec<CustomParser>,
    compiled: HashMap<String, Compiled>,
    in_progress: HashSet<String>,
}

impl Compiler<'_> {
    fn routes(
        &mut self,
        scope: &str,
        routes: &[RouteConfig],
    ) -> Result<(RouteTree<RouteValue>, RenderTable), SiteError> {
        let mut nodes: Vec<RouteNode<RouteValue>> = Vec::with_capacity(routes.len());
        let mut table = RenderTable::default();

        for route in routes {
            let path = format!("{}.{}", scope, route.name);
            let pattern = Pattern::parse_with(&route.pattern, &self.custom).map_err(|source| {
                SiteError::Pattern {
                    route: path.clone(),
                    source,
                }
            })?;
            let name = route.name.clone();

            match route.kind() {
                RouteKind::Leaf => {
                    let methods = route
                        .methods
                        .iter()
                        .map(|m| {
                            parse_method(m).ok_or_else(|| SiteError::Method {
                                route: path.clone(),
                                method: m.clone(),
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    table.leaf(&name, pattern.clone());
                    let leaf = Leaf::new(name.clone(), pattern, move |captures| {
                        Some(RouteValue::Resource {
                            name: name.clone(),
                            captures: captures.into_vec(),
                        })
                    });
                    nodes.push(leaf.methods(methods).into());
                }
                RouteKind::Parent => {
                    let (children, child_table) = self.routes(&path, &route.children)?;
                    table.parent(&name, pattern.clone(), child_table);
                    let parent = Parent::new(name.clone(), pattern, children, move |captures, child| {
                        Some(RouteValue::Nested {
                            name: name.clone(),
                            captures: captures.into_vec(),
                            child: Box::new(child),
                        })
                    });
                    nodes.push(parent.into());
                }
                RouteKind::Mount(subsite) => {
                    let (tree, sub_table) = self.subsite(&path, subsite)?;
                    table.mount(&name, pattern.clone(), sub_table);
                    let mount = Mount::new(name.clone(), pattern, tree, move |captures, inner| {
                        Some(RouteValue::Subsite {
                            name: name.clone(),
                            captures: captures.into_vec(),
                            route: Box::new(inner),
                        })
                    });
                    nodes.push(mount.into());
                }
            }
        }

        let tree = RouteTree::new(nodes).map_err(|source| SiteError::Tree {
            scope: scope.to_string(),
            source,
        })?;
        Ok((tree, table))
    }

    fn subsite(&mut self, route: &str, name: &str) -> Result<Compiled, SiteError> {
        if let Some((tree, table)) = self.compiled.get(name) {
            return Ok((tree.clone(), table.clone()));
        }
        let Some(subsite) = self.config.subsites.get(name) else {
            return Err(SiteError::UnknownSubsite {
                route: route.to_string(),
                subsite: name.to_string(),
            });
        };
        if !self.in_progress.insert(name.to_string()) {
            return Err(SiteError::Cycle(name.to_string()));
        }

        let scope = format!("subsites.{}", name);
        let (tree, table) = self.routes(&scope, &subsite.routes)?;
        let compiled = (Arc::new(tree), Arc::new(table));

        self.in_progress.remove(name);
        self.compiled.insert(name.to_string(), compiled.clone());
        Ok(compiled)
    }
}
