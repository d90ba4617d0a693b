//! Sub-site delegation.
//!
//! A mount hands every segment left after its prefix to a sub-site and lifts
//! the sub-site's route value into the parent's route type. The parent never
//! looks inside the sub-site; the only capability required is producing an
//! optional route from a segment list.

use std::marker::PhantomData;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::tree::RouteTree;

/// Something that can be mounted below a prefix.
pub trait Subsite: Send + Sync {
    type Route;

    /// Parse the segments left after the mount prefix. Method filtering, if
    /// any, is the sub-site's own business.
    fn parse_subroute(&self, segments: &[String], method: Option<&Method>) -> Option<Self::Route>;
}

/// A mounted route tree filters methods itself and collapses rejections,
/// exactly like its own top-level entry point would.
impl<R> Subsite for RouteTree<R> {
    type Route = R;

    fn parse_subroute(&self, segments: &[String], method: Option<&Method>) -> Option<R> {
        self.dispatch(segments, method).into_route()
    }
}

impl<S: Subsite + ?Sized> Subsite for Arc<S> {
    type Route = S::Route;

    fn parse_subroute(&self, segments: &[String], method: Option<&Method>) -> Option<Self::Route> {
        (**self).parse_subroute(segments, method)
    }
}

/// Sub-site backed by a plain function of the remaining segments.
pub struct SubsiteFn<F, S> {
    parse: F,
    _route: PhantomData<fn() -> S>,
}

/// Wrap a function as a sub-site.
pub fn subsite_fn<F, S>(parse: F) -> SubsiteFn<F, S>
where
    F: Fn(&[String]) -> Option<S> + Send + Sync,
{
    SubsiteFn {
        parse,
        _route: PhantomData,
    }
}

impl<F, S> Subsite for SubsiteFn<F, S>
where
    F: Fn(&[String]) -> Option<S> + Send + Sync,
{
    type Route = S;

    fn parse_subroute(&self, segments: &[String], _method: Option<&Method>) -> Option<S> {
        (self.parse)(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::dispatch::Dispatch;
    use crate::routing::pattern::Pattern;
    use crate::routing::tree::{Leaf, Mount, RouteNode};

    #[derive(Debug, PartialEq)]
    enum Route {
        Api(Vec<String>),
        Fallback,
    }

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_function_subsite_receives_whole_rest() {
        let api = subsite_fn(|rest: &[String]| (rest.first()? == "v1").then(|| rest.to_vec()));
        let nodes: Vec<RouteNode<Route>> = vec![
            Mount::new("api", Pattern::parse("/api").unwrap(), api, |_, r| Some(Route::Api(r))).into(),
            Leaf::new("fallback", Pattern::parse("/api/{*rest}").unwrap(), |_| Some(Route::Fallback)).into(),
        ];
        let tree = RouteTree::new(nodes).unwrap();

        assert_eq!(
            tree.dispatch(&segs(&["api", "v1", "x"]), None).into_route(),
            Some(Route::Api(segs(&["v1", "x"])))
        );
        // The mount committed; the later wildcard sibling is never tried.
        assert_eq!(tree.dispatch(&segs(&["api", "v2"]), None), Dispatch::NotFound);
    }

    #[test]
    fn test_mounted_tree_filters_its_own_methods() {
        let sub: RouteTree<()> = RouteTree::new([Leaf::new("ping", Pattern::parse("/ping").unwrap(), |_| Some(()))
            .methods([Method::GET])])
        .unwrap();
        let sub = Arc::new(sub);
        assert_eq!(sub.parse_subroute(&segs(&["ping"]), Some(&Method::GET)), Some(()));
        assert_eq!(sub.parse_subroute(&segs(&["ping"]), Some(&Method::POST)), None);
    }
}
