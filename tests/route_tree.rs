//! Dispatch behaviour of typed route trees.

mod common;

use std::sync::Arc;
use std::thread;

use axum::http::Method;
use proptest::prelude::*;
use route_dispatch::routing::{subsite_fn, Dispatch, Leaf, Mount, Parent, PathRequest, RouteTree, TreeError};

use common::{api_tree, app_tree, p, segs, AdminRoute, ApiRoute, AppRoute};

fn get(path: &str) -> PathRequest {
    PathRequest::from_path(path).with_method(Method::GET)
}

#[test]
fn test_typed_parameter_match() {
    let tree = app_tree();
    assert_eq!(tree.parse_route(&get("/users/42")), Some(AppRoute::User(42)));
    assert_eq!(tree.parse_route(&get("/users/-7")), Some(AppRoute::User(-7)));
}

#[test]
fn test_method_rejection_collapses_in_parse_route() {
    let tree = app_tree();
    let request = PathRequest::from_path("/users/42").with_method(Method::DELETE);

    assert_eq!(tree.parse_route(&request), None);
    assert_eq!(
        tree.resolve(&request),
        Dispatch::Matched {
            route: AppRoute::User(42),
            method_ok: false
        }
    );
}

#[test]
fn test_unparseable_segment_is_not_found() {
    let tree = app_tree();
    assert!(tree.resolve(&get("/users/abc")).is_not_found());
    assert!(tree.resolve(&get("/users/42/extra")).is_not_found());
}

#[test]
fn test_empty_path() {
    assert_eq!(app_tree().parse_route(&get("/")), Some(AppRoute::Home));
    assert_eq!(api_tree().dispatch(&[], None), Dispatch::NotFound);
}

#[test]
fn test_no_method_skips_filtering() {
    let tree = app_tree();
    assert_eq!(
        tree.resolve(&PathRequest::from_path("/users/42")),
        Dispatch::Matched {
            route: AppRoute::User(42),
            method_ok: true
        }
    );
}

#[test]
fn test_declaration_order_wins() {
    assert_eq!(app_tree().parse_route(&get("/users/new")), Some(AppRoute::NewUser));

    #[derive(Debug, PartialEq)]
    enum Order {
        ByName(String),
        New,
    }
    let tree: RouteTree<Order> = RouteTree::new([
        Leaf::new("by_name", p("/users/{name}"), |c| {
            Some(Order::ByName(c.text(0)?.to_string()))
        }),
        Leaf::new("new", p("/users/new"), |_| Some(Order::New)),
    ])
    .unwrap();
    assert_eq!(
        tree.dispatch(&segs(&["users", "new"]), None).into_route(),
        Some(Order::ByName("new".into()))
    );
}

#[test]
fn test_wildcard_takes_remaining_segments() {
    let tree = app_tree();
    assert_eq!(
        tree.parse_route(&get("/static/css/site/main.css")),
        Some(AppRoute::Static(segs(&["css", "site", "main.css"])))
    );
    assert_eq!(tree.parse_route(&get("/static")), Some(AppRoute::Static(vec![])));
}

#[test]
fn test_parent_children() {
    let tree = app_tree();
    assert_eq!(
        tree.parse_route(&get("/admin")),
        Some(AppRoute::Admin(AdminRoute::Dashboard))
    );
    assert_eq!(
        tree.parse_route(&get("/admin/reports/weekly")),
        Some(AppRoute::Admin(AdminRoute::Report("weekly".into())))
    );
}

#[test]
fn test_parent_falls_through_when_no_child_matches() {
    assert_eq!(
        app_tree().parse_route(&get("/admin/reports/monthly")),
        Some(AppRoute::AdminFallback(segs(&["reports", "monthly"])))
    );
}

#[test]
fn test_mount_delegates_rest() {
    assert_eq!(
        app_tree().parse_route(&get("/api/2/status")),
        Some(AppRoute::Api(2, ApiRoute::Status))
    );
}

#[test]
fn test_mount_commits_after_prefix() {
    let tree = app_tree();
    // The sub-site rejects `unknown`; the later legacy wildcard is never tried.
    assert!(tree.resolve(&get("/api/2/unknown")).is_not_found());
    // A prefix that does not parse leaves the mount out entirely.
    assert_eq!(
        tree.parse_route(&get("/api/v2/status")),
        Some(AppRoute::LegacyApi(segs(&["v2", "status"])))
    );
}

#[test]
fn test_mounted_tree_method_rejection_is_not_found() {
    let request = PathRequest::from_path("/api/2/status").with_method(Method::POST);
    assert_eq!(app_tree().resolve(&request), Dispatch::NotFound);
}

#[test]
fn test_constructor_refusal_tries_next_sibling() {
    #[derive(Debug, PartialEq)]
    enum Page {
        Number(u64),
        Other(Vec<String>),
    }
    let tree: RouteTree<Page> = RouteTree::new([
        Leaf::new("number", p("/page/{n:uint}"), |c| {
            c.uint(0).filter(|n| *n > 0).map(Page::Number)
        }),
        Leaf::new("other", p("/page/{*rest}"), |c| Some(Page::Other(c.segments(0)?.to_vec()))),
    ])
    .unwrap();

    assert_eq!(tree.dispatch(&segs(&["page", "3"]), None).into_route(), Some(Page::Number(3)));
    assert_eq!(
        tree.dispatch(&segs(&["page", "0"]), None).into_route(),
        Some(Page::Other(segs(&["0"])))
    );
}

#[test]
fn test_function_subsite() {
    #[derive(Debug, PartialEq)]
    enum Storage {
        Files(String),
    }
    let files = subsite_fn(|rest: &[String]| (!rest.is_empty()).then(|| rest.join("/")));
    let tree: RouteTree<Storage> =
        RouteTree::new([Mount::new("files", p("/files"), files, |_, path| Some(Storage::Files(path)))]).unwrap();

    assert_eq!(
        tree.dispatch(&segs(&["files", "a", "b.txt"]), Some(&Method::PUT)),
        Dispatch::Matched {
            route: Storage::Files("a/b.txt".into()),
            method_ok: true
        }
    );
    assert!(tree.dispatch(&segs(&["files"]), None).is_not_found());
}

#[test]
fn test_parent_captures_reach_wrap() {
    #[derive(Debug, PartialEq)]
    enum Org {
        Member(String, i64),
    }
    let members: RouteTree<i64> = RouteTree::new([Leaf::new("member", p("/members/{id:int}"), |c| c.int(0))]).unwrap();
    let tree: RouteTree<Org> = RouteTree::new([Parent::new("org", p("/orgs/{org}"), members, |c, id| {
        Some(Org::Member(c.text(0)?.to_string(), id))
    })])
    .unwrap();

    assert_eq!(
        tree.dispatch(&segs(&["orgs", "acme", "members", "9"]), None).into_route(),
        Some(Org::Member("acme".into(), 9))
    );
}

#[test]
fn test_absolute_url_and_decoding() {
    let tree = app_tree();
    assert_eq!(
        tree.parse_route(&get("https://example.com/users/42?tab=posts#top")),
        Some(AppRoute::User(42))
    );
    assert_eq!(
        tree.parse_route(&get("/static/my%20file.txt")),
        Some(AppRoute::Static(segs(&["my file.txt"])))
    );
}

#[test]
fn test_dot_segments_route_alike_in_every_form() {
    let tree = app_tree();
    for path in ["/static/../users/1", "https://example.com/static/../users/1", "/users/./1"] {
        assert_eq!(tree.parse_route(&get(path)), Some(AppRoute::User(1)), "{}", path);
    }
}

#[test]
fn test_invalid_trees_rejected() {
    let duplicate = RouteTree::<()>::new([
        Leaf::new("a", p("/x"), |_| Some(())),
        Leaf::new("a", p("/y"), |_| Some(())),
    ]);
    assert!(matches!(duplicate, Err(TreeError::DuplicateName(name)) if name == "a"));

    let unnamed = RouteTree::<()>::new([Leaf::new("", p("/x"), |_| Some(()))]);
    assert!(matches!(unnamed, Err(TreeError::EmptyName)));

    let children = RouteTree::<()>::new([Leaf::new("x", p("/x"), |_| Some(()))]).unwrap();
    let prefixed = RouteTree::<()>::new([Parent::new("p", p("/p/{*rest}"), children, |_, r| Some(r))]);
    assert!(matches!(prefixed, Err(TreeError::WildcardInPrefix(name)) if name == "p"));
}

#[test]
fn test_shared_tree_across_threads() {
    let tree = Arc::new(app_tree());
    let handles: Vec<_> = (0..8i64)
        .map(|i| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                let path = format!("/users/{}", i);
                tree.parse_route(&get(&path))
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(AppRoute::User(i as i64)));
    }
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("users".to_string()),
        Just("admin".to_string()),
        Just("api".to_string()),
        Just("static".to_string()),
        Just("reports".to_string()),
        Just("new".to_string()),
        "[a-z0-9-]{1,6}",
    ]
}

proptest! {
    #[test]
    fn prop_dispatch_is_total_and_deterministic(path in prop::collection::vec(segment(), 0..6)) {
        let tree = app_tree();
        let first = tree.dispatch(&path, Some(&Method::GET));
        let second = tree.dispatch(&path, Some(&Method::GET));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_unfiltered_match_is_never_rejected(path in prop::collection::vec(segment(), 0..6)) {
        let outcome = app_tree().dispatch(&path, None);
        prop_assert!(!outcome.is_method_rejected());
    }

    #[test]
    fn prop_int_segments_round_trip(id in any::<i64>()) {
        let path = segs(&["users", &id.to_string()]);
        prop_assert_eq!(app_tree().dispatch(&path, None).into_route(), Some(AppRoute::User(id)));
    }
}
