//! # Server Module
//!
//! HTTP plumbing around the protocol chain.
//!
//! - [`request`] turns a `tiny_http` request into an
//!   [`LdpRequest`](crate::dispatcher::LdpRequest)
//! - [`response`] writes an [`LdpResponse`](crate::dispatcher::LdpResponse)
//!   back out
//! - [`LdpService`] owns the chain and answers `GET /health`
//! - [`HttpServer`] binds the socket and runs the worker threads

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::parse_request;
pub use service::{LdpService, HEALTH_PATH};
