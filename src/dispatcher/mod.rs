//! # Dispatcher Module
//!
//! Routes an HTTP method against a resolved resource instance.
//!
//! ## Overview
//!
//! Each [`ResourceKind`](crate::resource::ResourceKind) owns a fixed table
//! of method handlers built once at first use. [`Dispatcher::dispatch`]
//! looks the method up in that table and runs the handler with the
//! request's current status and headers:
//!
//! - `GET` returns the instance itself as the body, to be serialized further
//!   out in the chain
//! - `HEAD` and `OPTIONS` return an empty body with the same status and
//!   headers
//! - `PUT`, `POST` and `DELETE` write through the
//!   [`Repository`](crate::repository::Repository)
//!
//! A method with no table entry fails with `405 Method Not Allowed` naming
//! the method and the kind's `Allow` set. Nothing else produces a 405: a
//! handler that fails returns its own error.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use http::Method;
//! use url::Url;
//! use ldp_server::dispatcher::{Body, Dispatcher, HeaderVec, LdpRequest};
//! use ldp_server::repository::{MemoryRepository, Repository};
//!
//! let repo = Arc::new(MemoryRepository::with_root("http://localhost/"));
//! let root = repo.find("http://localhost/").unwrap();
//! let dispatcher = Dispatcher::new(repo);
//! let base = Url::parse("http://localhost/").unwrap();
//!
//! let req = LdpRequest::new(Method::HEAD, &base, "/");
//! let res = dispatcher
//!     .dispatch(root.clone(), &req.method, 200, HeaderVec::new(), &req)
//!     .unwrap();
//! assert_eq!(res.body, Body::Empty);
//!
//! let err = dispatcher
//!     .dispatch(root, &Method::PATCH, 200, HeaderVec::new(), &req)
//!     .unwrap_err();
//! assert_eq!(err.status(), 405);
//! ```

mod core;
mod handlers;

pub use self::core::{
    generate_request_id, set_header, Body, Dispatcher, HeaderVec, LdpRequest, LdpResponse,
    MAX_INLINE_HEADERS,
};
pub use handlers::{allowed_methods, apply_protocol_headers, creation_kind, Handler};
