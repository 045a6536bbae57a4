//! End-to-end tests over a real `may_minihttp` server on an ephemeral port.

use serde_json::json;

mod common;
use common::fixtures::seeded_config;
use common::http::{parse_response, parse_response_parts, request, send_request};
use common::test_server::TestServer;

#[test]
fn test_health_endpoint() {
    let server = TestServer::start(&seeded_config());
    let resp = send_request(&server.addr, &request("GET", "/health", None));
    let (status, body) = parse_response(&resp);
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
}

#[test]
fn test_get_item_and_not_found() {
    let server = TestServer::start(&seeded_config());
    let (status, ct, body) =
        parse_response_parts(&send_request(&server.addr, &request("GET", "/items/1", None)));
    assert_eq!(status, 200);
    assert_eq!(ct, "application/json");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).unwrap(),
        json!({"id": "1", "name": "Item One"})
    );

    let (status, body) = parse_response(&send_request(&server.addr, &request("GET", "/items/9", None)));
    assert_eq!(status, 404);
    assert_eq!(body, json!({"message": "Item 9 not found"}));
}

#[test]
fn test_create_update_delete_over_http() {
    let server = TestServer::start(&seeded_config());

    let (status, created) = parse_response(&send_request(
        &server.addr,
        &request("POST", "/items", Some(r#"{"name":"Widget"}"#)),
    ));
    assert_eq!(status, 201);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = parse_response(&send_request(
        &server.addr,
        &request("PUT", &format!("/items/{id}"), Some(r#"{"name":"Gadget"}"#)),
    ));
    assert_eq!(status, 200);
    assert_eq!(updated, json!({"id": id, "name": "Gadget"}));

    let (status, removed) =
        parse_response(&send_request(&server.addr, &request("DELETE", &format!("/items/{id}"), None)));
    assert_eq!(status, 200);
    assert_eq!(removed["message"], format!("Item {id} has been removed"));

    let (status, listed) = parse_response(&send_request(&server.addr, &request("GET", "/items", None)));
    assert_eq!(status, 200);
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[test]
fn test_missing_name_is_400() {
    let server = TestServer::start(&seeded_config());
    let (status, body) =
        parse_response(&send_request(&server.addr, &request("POST", "/items", Some("{}"))));
    assert_eq!(status, 400);
    assert_eq!(body["violations"][0]["kind"], "missing");
}

#[test]
fn test_malformed_json_is_400() {
    let server = TestServer::start(&seeded_config());
    let (status, body) = parse_response(&send_request(
        &server.addr,
        &request("POST", "/items", Some("{name: Widget")),
    ));
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Request body is not valid JSON");
    assert_eq!(body["violations"][0]["field"], "$body");
}

#[test]
fn test_junk_body_on_delete_still_deletes() {
    let server = TestServer::start(&seeded_config());
    let (status, body) = parse_response(&send_request(
        &server.addr,
        &request("DELETE", "/items/1", Some("junk")),
    ));
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Item 1 has been removed"}));
}

#[test]
fn test_query_string_is_ignored_for_routing() {
    let server = TestServer::start(&seeded_config());
    let (status, body) =
        parse_response(&send_request(&server.addr, &request("GET", "/items?limit=1", None)));
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[test]
fn test_unknown_route() {
    let server = TestServer::start(&seeded_config());
    let (status, body) = parse_response(&send_request(&server.addr, &request("GET", "/widgets", None)));
    assert_eq!(status, 404);
    assert_eq!(body, json!({"message": "No route for GET /widgets"}));
}

#[test]
fn test_metrics_endpoint() {
    let server = TestServer::start(&seeded_config());
    let _ = send_request(&server.addr, &request("GET", "/items/1", None));
    let _ = send_request(&server.addr, &request("GET", "/items/404", None));
    let (status, ct, body) =
        parse_response_parts(&send_request(&server.addr, &request("GET", "/metrics", None)));
    assert_eq!(status, 200);
    assert!(ct.starts_with("text/plain"), "{ct}");
    assert!(body.contains("itemrouter_requests_total 2"), "{body}");
    assert!(body.contains("itemrouter_not_found_total 1"), "{body}");
}
