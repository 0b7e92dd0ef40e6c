//! Table-building and matching semantics: leaf classification, method rules,
//! declaration-order priority, parameter capture.

use http::Method;
use paveroute::{handler, DefinitionError, MethodBundle, MethodRule, RouteNode, RouteTree, Router};
use serde_json::json;

fn noop() -> RouteNode {
    handler(|_msg, _hdrs, _ctx, _next| Ok(json!(null)))
}

#[test]
fn handler_leaf_builds_one_catch_all_record() {
    let tree: RouteNode = RouteTree::new().at("a", noop()).into();
    let router = Router::new(&tree).unwrap();

    let records = router.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "/a");
    assert_eq!(records[0].method, MethodRule::All);
}

#[test]
fn bundle_leaf_builds_one_record_per_verb() {
    let tree: RouteNode = RouteTree::new()
        .at(
            "r",
            MethodBundle::new()
                .get(|_msg, _hdrs, _ctx, _next| Ok(json!("get")))
                .post(|_msg, _hdrs, _ctx, _next| Ok(json!("post"))),
        )
        .into();
    let router = Router::new(&tree).unwrap();

    let records = router.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].method, MethodRule::Only(Method::GET));
    assert_eq!(records[1].method, MethodRule::Only(Method::POST));
    assert_eq!(records[0].path, "/r");
    assert_eq!(records[1].path, "/r");
}

#[test]
fn empty_bundle_contributes_no_records() {
    let tree: RouteNode = RouteTree::new().at("r", MethodBundle::new()).into();
    let router = Router::new(&tree).unwrap();
    assert!(router.records().is_empty());
}

#[test]
fn value_leaf_aborts_construction() {
    let tree: RouteNode = RouteTree::new().at("a", json!(1)).into();
    let err = Router::new(&tree).unwrap_err();
    assert!(matches!(err, DefinitionError::LeafNotHandler { .. }));
    assert!(err.to_string().contains("must be function"));
}

#[test]
fn non_mapping_root_aborts_construction() {
    let err = Router::new(&noop()).unwrap_err();
    assert!(matches!(err, DefinitionError::NotAMapping("handler")));

    let err = Router::new(&RouteNode::from(json!(42))).unwrap_err();
    assert!(matches!(err, DefinitionError::NotAMapping("value")));
}

#[test]
fn empty_tree_builds_a_router_that_matches_nothing() {
    let router = Router::new(&RouteTree::new().into()).unwrap();
    assert!(router.match_route("get", "/anything").is_none());
    assert!(router.match_route("get", "/").is_none());
}

#[test]
fn nested_tree_matches_joined_paths() {
    let tree: RouteNode = RouteTree::new()
        .at(
            "a",
            RouteTree::new()
                .at("b", RouteTree::new().at("c", noop()).at("d/eee", noop()))
                .at("f/:gggg", noop()),
        )
        .into();
    let router = Router::new(&tree).unwrap();

    assert!(router.match_route("get", "/a/b/c").is_some());
    assert!(router.match_route("get", "/a/b/d/eee").is_some());
    assert!(router.match_route("get", "/a/f/some_string").is_some());
    assert!(router.match_route("get", "/a/b").is_none());
    assert!(router.match_route("get", "/a/b/c/d").is_none());
}

#[test]
fn params_are_extracted_in_template_order() {
    let tree: RouteNode = RouteTree::new()
        .at("a", RouteTree::new().at("h/:i/:j/:k", noop()))
        .into();
    let router = Router::new(&tree).unwrap();

    let m = router.match_route("get", "/a/h/iii/jjj/kkkk").unwrap();
    let params: Vec<(String, String)> = m.params.into_iter().collect();
    assert_eq!(
        params,
        vec![
            ("i".to_string(), "iii".to_string()),
            ("j".to_string(), "jjj".to_string()),
            ("k".to_string(), "kkkk".to_string()),
        ]
    );
}

#[test]
fn first_declared_route_wins_over_later_overlaps() {
    let tree: RouteNode = RouteTree::new()
        .at("u", RouteTree::new().at(":id", noop()).at("me", noop()))
        .into();
    let router = Router::new(&tree).unwrap();

    // "/u/me" structurally matches both templates; declaration order decides.
    let m = router.match_route("get", "/u/me").unwrap();
    assert_eq!(m.record.path, "/u/:id");
    assert_eq!(m.params.as_slice(), &[("id".to_string(), "me".to_string())]);
}

#[test]
fn undeclared_verb_on_a_bundle_is_unmatched() {
    let tree: RouteNode = RouteTree::new()
        .at(
            "r",
            MethodBundle::new().get(|_msg, _hdrs, _ctx, _next| Ok(json!("get"))),
        )
        .into();
    let router = Router::new(&tree).unwrap();

    assert!(router.match_route("get", "/r").is_some());
    assert!(router.match_route("put", "/r").is_none());
}

#[test]
fn catch_all_at_the_same_path_picks_up_undeclared_verbs() {
    let tree: RouteNode = RouteTree::new()
        .at(
            "r",
            MethodBundle::new().get(|_msg, _hdrs, _ctx, _next| Ok(json!("get"))),
        )
        .at("r", noop())
        .into();
    let router = Router::new(&tree).unwrap();

    let m = router.match_route("put", "/r").unwrap();
    assert_eq!(m.record.method, MethodRule::All);
    // The bundle record still shadows the catch-all for its own verb.
    let m = router.match_route("get", "/r").unwrap();
    assert_eq!(m.record.method, MethodRule::Only(Method::GET));
}

#[test]
fn extension_verbs_are_supported_via_on() {
    let propfind = Method::from_bytes(b"PROPFIND").unwrap();
    let tree: RouteNode = RouteTree::new()
        .at(
            "dav",
            MethodBundle::new().on(propfind, |_msg, _hdrs, _ctx, _next| Ok(json!("dav"))),
        )
        .into();
    let router = Router::new(&tree).unwrap();

    assert!(router.match_route("propfind", "/dav").is_some());
    assert!(router.match_route("get", "/dav").is_none());
}

#[test]
fn method_comparison_ignores_case() {
    let tree: RouteNode = RouteTree::new()
        .at(
            "r",
            MethodBundle::new().get(|_msg, _hdrs, _ctx, _next| Ok(json!("get"))),
        )
        .into();
    let router = Router::new(&tree).unwrap();

    assert!(router.match_route("GET", "/r").is_some());
    assert!(router.match_route("get", "/r").is_some());
}
