//! # ldp-server
//!
//! A [Linked Data Platform](https://www.w3.org/TR/ldp/) server: HTTP
//! read/write access to RDF resources and containers.
//!
//! ## Overview
//!
//! The core decides two things for every request: which LDP kind a newly
//! created resource must be, and how an existing resource answers a given
//! HTTP method. Everything else (storage, HTTP plumbing, configuration)
//! sits around that core.
//!
//! ## Architecture
//!
//! - **[`link_header`]** - `Link:` header parsing
//! - **[`resource`]** - the six resource kinds, their capabilities, and
//!   interaction model resolution
//! - **[`dispatcher`]** - request/response types and per-kind method dispatch
//! - **[`middleware`]** - the protocol chain: tracing, content negotiation,
//!   errors, responses, requests
//! - **[`app`]** - maps a request URI to a resource instance
//! - **[`repository`]** - resource storage (in-memory)
//! - **[`graph`]** - RDF graphs and their N-Triples form
//! - **[`server`]** - `tiny_http` front end
//! - **[`config`]**, **[`logging`]**, **[`cli`]** - process wiring
//!
//! ### Request Flow
//!
//! ```text
//! HTTP request
//!   -> Tracing            span per request
//!   -> ContentNegotiation graph -> text/turtle (default) | n-triples
//!   -> Errors             RequestError -> (status, headers, message)
//!   -> Responses          Resource -> graph | bytes
//!   -> Requests           Resource + method -> handler table
//!   -> LdpApp             URI -> Resource (or 404 / 410)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use http::Method;
//! use url::Url;
//! use ldp_server::dispatcher::LdpRequest;
//! use ldp_server::repository::MemoryRepository;
//! use ldp_server::server::LdpService;
//!
//! let base = Url::parse("http://localhost:8080/").unwrap();
//! let repo = Arc::new(MemoryRepository::with_root(base.as_str()));
//! let service = LdpService::new(repo, base.clone(), "text/turtle");
//!
//! let res = service.handle(&LdpRequest::new(Method::GET, &base, "/"));
//! assert_eq!(res.status, 200);
//! assert_eq!(res.get_header("content-type"), Some("text/turtle"));
//! assert!(res.get_header("etag").is_some());
//! ```
//!
//! Running the binary:
//!
//! ```bash
//! ldp-server serve --addr 127.0.0.1:8080 --base-uri http://localhost:8080/
//! curl -i -X POST -H 'Content-Type: text/turtle' -H 'Slug: note' \
//!      --data '<> <http://purl.org/dc/terms/title> "hello" .' \
//!      http://localhost:8080/
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod graph;
pub mod link_header;
pub mod logging;
pub mod middleware;
pub mod repository;
pub mod resource;
pub mod server;
pub mod vocab;

pub use dispatcher::{Dispatcher, LdpRequest, LdpResponse};
pub use error::RequestError;
pub use resource::{Resource, ResourceKind};
