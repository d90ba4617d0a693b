//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use route_dispatch::config::{load_config, SiteConfig};
use route_dispatch::routing::{CustomParser, Leaf, Mount, Parent, Pattern, RouteNode, RouteTree};
use route_dispatch::Site;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    NewUser,
    User(i64),
    Static(Vec<String>),
    Admin(AdminRoute),
    AdminFallback(Vec<String>),
    Api(u64, ApiRoute),
    LegacyApi(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminRoute {
    Dashboard,
    Report(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRoute {
    Status,
}

pub fn p(pattern: &str) -> Pattern {
    Pattern::parse(pattern).unwrap()
}

pub fn segs(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

pub fn api_tree() -> RouteTree<ApiRoute> {
    RouteTree::new([Leaf::new("status", p("/status"), |_| Some(ApiRoute::Status)).methods([Method::GET])])
        .unwrap()
}

/// A typed tree exercising every node kind.
pub fn app_tree() -> RouteTree<AppRoute> {
    let kinds = [CustomParser::one_of("kind", ["daily", "weekly"])];
    let admin: RouteTree<AdminRoute> = RouteTree::new([
        Leaf::new("dashboard", p("/"), |_| Some(AdminRoute::Dashboard)),
        Leaf::new(
            "report",
            Pattern::parse_with("/reports/{kind:kind}", &kinds).unwrap(),
            |c| Some(AdminRoute::Report(c.text(0)?.to_string())),
        ),
    ])
    .unwrap();

    let nodes: Vec<RouteNode<AppRoute>> = vec![
        Leaf::new("home", p("/"), |_| Some(AppRoute::Home))
            .methods([Method::GET])
            .into(),
        Leaf::new("new_user", p("/users/new"), |_| Some(AppRoute::NewUser))
            .methods([Method::GET])
            .into(),
        Leaf::new("user", p("/users/{id:int}"), |c| c.int(0).map(AppRoute::User))
            .methods([Method::GET])
            .into(),
        Leaf::new("static", p("/static/{*path}"), |c| {
            Some(AppRoute::Static(c.segments(0)?.to_vec()))
        })
        .into(),
        Parent::new("admin", p("/admin"), admin, |_, a| Some(AppRoute::Admin(a))).into(),
        Leaf::new("admin_fallback", p("/admin/{*rest}"), |c| {
            Some(AppRoute::AdminFallback(c.segments(0)?.to_vec()))
        })
        .into(),
        Mount::new("api", p("/api/{version:uint}"), Arc::new(api_tree()), |c, r| {
            Some(AppRoute::Api(c.uint(0)?, r))
        })
        .into(),
        Leaf::new("legacy_api", p("/api/{*rest}"), |c| {
            Some(AppRoute::LegacyApi(c.segments(0)?.to_vec()))
        })
        .into(),
    ];
    RouteTree::new(nodes).unwrap()
}

pub fn sample_config_path() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/routes.toml"))
}

pub fn sample_config() -> SiteConfig {
    load_config(&sample_config_path()).unwrap()
}

pub fn sample_site() -> Arc<Site> {
    Arc::new(Site::compile(&sample_config()).unwrap())
}

pub fn local_addr(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}
