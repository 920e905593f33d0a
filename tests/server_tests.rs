//! Integration tests for the HTTP front end
//!
//! # Test Coverage
//!
//! - Server startup on an ephemeral port and graceful stop
//! - `GET /health` outside the protocol chain
//! - LDP headers and bodies surviving the trip through `tiny_http`
//! - Create, read and delete over real sockets
//! - Error responses with their plain-text bodies
//!
//! Requests are written as raw HTTP/1.1 with `Connection: close` so each
//! test reads exactly one response.

mod common;

use common::raw::{parse_parts, send_request};
use common::*;
use ldp_server::config::ServerConfig;
use ldp_server::repository::Repository;
use ldp_server::server::{HttpServer, LdpService};

fn get(path: &str, extra: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n{extra}Connection: close\r\n\r\n")
}

#[test]
fn test_health_endpoint() {
    let (handle, _) = start_server();
    let resp = send_request(&handle.local_addr(), &get("/health", ""));
    handle.stop();

    let (status, headers, body) = parse_parts(&resp);
    assert_eq!(status, 200);
    assert_eq!(
        headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[test]
fn test_get_root_over_http() {
    let (handle, _) = start_server();
    let resp = send_request(&handle.local_addr(), &get("/", ""));
    handle.stop();

    let (status, headers, _) = parse_parts(&resp);
    assert_eq!(status, 200);
    assert_eq!(headers.get("content-type").map(String::as_str), Some("text/turtle"));
    assert!(headers.contains_key("etag"));
    assert!(headers["link"].contains(LDP_BASIC_CONTAINER));
    assert_eq!(headers["vary"], "Accept");
}

#[test]
fn test_post_get_delete_over_http() {
    let (handle, repo) = start_server();
    let addr = handle.local_addr();

    let body = "<> <http://purl.org/dc/terms/title> \"over the wire\" .";
    let post = format!(
        "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Type: text/turtle\r\nSlug: wire\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (status, headers, _) = parse_parts(&send_request(&addr, &post));
    assert_eq!(status, 201);
    assert_eq!(headers["location"], "http://localhost/wire");
    assert!(repo.contains("http://localhost/wire"));

    let resp = send_request(&addr, &get("/wire", "Accept: application/n-triples\r\n"));
    let (status, headers, body) = parse_parts(&resp);
    assert_eq!(status, 200);
    assert_eq!(headers["content-type"], "application/n-triples");
    assert!(body.contains("\"over the wire\""));

    let delete = "DELETE /wire HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
    let (status, _, _) = parse_parts(&send_request(&addr, delete));
    assert_eq!(status, 204);

    let (status, _, _) = parse_parts(&send_request(&addr, &get("/wire", "")));
    assert_eq!(status, 410);
    handle.stop();
}

#[test]
fn test_method_not_allowed_over_http() {
    let (handle, _) = start_server();
    let patch = "PATCH / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
    let resp = send_request(&handle.local_addr(), patch);
    handle.stop();

    let (status, headers, body) = parse_parts(&resp);
    assert_eq!(status, 405);
    assert!(headers["allow"].contains("GET"));
    assert!(headers["content-type"].starts_with("text/plain"));
    assert_eq!(body, "Method not allowed: PATCH");
}

#[test]
fn test_query_string_is_ignored() {
    let (handle, _) = start_server();
    let resp = send_request(&handle.local_addr(), &get("/?page=2", ""));
    handle.stop();
    assert_eq!(parse_parts(&resp).0, 200);
}

#[test]
fn test_missing_resource_over_http() {
    let (handle, _) = start_server();
    let resp = send_request(&handle.local_addr(), &get("/absent", ""));
    handle.stop();
    assert_eq!(parse_parts(&resp).0, 404);
}

#[test]
fn test_server_from_config() {
    let mut config = ServerConfig {
        addr: "127.0.0.1:0".to_string(),
        base_uri: "http://data.example.org".to_string(),
        workers: 1,
        ..ServerConfig::default()
    };
    config.validate().unwrap();
    assert_eq!(config.base_uri, "http://data.example.org/");

    let service = LdpService::from_config(&config).unwrap();
    assert!(service.repository().contains("http://data.example.org/"));

    let handle = HttpServer::new(service, config.workers)
        .start(config.addr.as_str())
        .unwrap();
    handle.wait_ready().unwrap();
    let resp = send_request(
        &handle.local_addr(),
        "OPTIONS / HTTP/1.1\r\nHost: data.example.org\r\nConnection: close\r\n\r\n",
    );
    handle.stop();

    let (status, headers, _) = parse_parts(&resp);
    assert_eq!(status, 200);
    assert!(headers["allow"].contains("POST"));
}
