use std::sync::Arc;

use http::Method;
use smallvec::SmallVec;
use tracing::debug;
use url::Url;

use super::handlers;
use crate::error::RequestError;
use crate::graph::Graph;
use crate::link_header::{self, LinkEntry};
use crate::repository::Repository;
use crate::resource::Resource;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage for requests and responses.
///
/// Names are `Arc<str>` so the fixed protocol header names are shared
/// between responses instead of copied.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Generate a unique request ID for tracing (ULID string)
#[must_use]
pub fn generate_request_id() -> String {
    ulid::Ulid::new().to_string()
}

/// An inbound request as seen by the protocol core.
#[derive(Debug, Clone)]
pub struct LdpRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: String,
    pub method: Method,
    /// Request path as received
    pub path: String,
    /// Absolute URI of the target resource
    pub uri: String,
    /// Headers with lowercased names, in arrival order
    pub headers: HeaderVec,
    /// Parsed entries of every `Link` header
    pub links: Vec<LinkEntry>,
    pub body: Vec<u8>,
}

impl LdpRequest {
    /// A request for `path` on the origin of the server's `base` URI.
    ///
    /// `path` is absolute: under a base of `http://h/ldp/`, the path
    /// `/ldp/a` names `http://h/ldp/a`. Whether the result falls under the
    /// base path is decided later by [`Dispatcher::in_scope`].
    #[must_use]
    pub fn new(method: Method, base: &Url, path: &str) -> Self {
        let absolute = format!("/{}", path.trim_start_matches('/'));
        let uri = base
            .join(&absolute)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{absolute}", base.origin().ascii_serialization()));
        Self {
            request_id: generate_request_id(),
            method,
            path: path.to_string(),
            uri,
            headers: HeaderVec::new(),
            links: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Add a header. `Link` values are parsed as they arrive.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push_header(name, value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn push_header(&mut self, name: &str, value: String) {
        let name = name.to_ascii_lowercase();
        if name == "link" {
            self.links.extend(link_header::parse(&value));
        }
        self.headers.push((Arc::from(name), value));
    }

    /// First value of a header, compared case-insensitively.
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Media type of the body, lowercased and without parameters.
    #[must_use]
    pub fn content_type(&self) -> Option<String> {
        self.get_header("content-type")
            .and_then(|v| v.split(';').next())
            .map(|mt| mt.trim().to_ascii_lowercase())
            .filter(|mt| !mt.is_empty())
    }

    /// True if any `Link` entry has `rel="type"`.
    #[must_use]
    pub fn has_type_links(&self) -> bool {
        self.links.iter().any(|l| l.rel_is("type"))
    }
}

/// A response body before it is written out.
///
/// `Resource` is the hand-off between application logic and the dispatcher;
/// by the time a response leaves the chain it has been reduced to `Graph`,
/// `Bytes`, or `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Resource(Resource),
    Graph(Graph),
    Bytes(Vec<u8>),
}

impl Body {
    #[must_use]
    pub fn is_resource(&self) -> bool {
        matches!(self, Body::Resource(_))
    }

    /// Raw bytes. Graphs not yet negotiated fall back to N-Triples.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Empty => Vec::new(),
            Body::Resource(resource) => resource.to_response_body().into_bytes(),
            Body::Graph(graph) => graph.to_ntriples().into_bytes(),
            Body::Bytes(bytes) => bytes,
        }
    }
}

/// Response triple `(status, headers, body)` threaded through the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct LdpResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    pub headers: HeaderVec,
    pub body: Body,
}

impl LdpResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Body) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        set_header(&mut self.headers, name, value);
    }
}

/// Replace any header called `name` (case-insensitive) with a single value.
pub fn set_header(headers: &mut HeaderVec, name: &str, value: String) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((Arc::from(name), value));
}

/// Routes a method against a resolved resource instance.
///
/// Dispatch is a single lookup in the per-kind handler table. A missing
/// entry is the only thing that produces `405`; errors raised inside a
/// handler propagate unchanged. The root container, when one is set, has
/// no `DELETE` entry.
#[derive(Clone)]
pub struct Dispatcher {
    repository: Arc<dyn Repository>,
    root: Option<String>,
    reserved: Vec<String>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            repository,
            root: None,
            reserved: Vec::new(),
        }
    }

    /// Mark `uri` as the root container. It cannot be deleted, and only
    /// URIs beneath it are served.
    #[must_use]
    pub fn with_root(mut self, uri: impl Into<String>) -> Self {
        self.root = Some(uri.into());
        self
    }

    /// Keep `uri` from ever being created, by `POST` or by `PUT`.
    #[must_use]
    pub fn reserve(mut self, uri: impl Into<String>) -> Self {
        self.reserved.push(uri.into());
        self
    }

    #[must_use]
    pub fn repository(&self) -> &dyn Repository {
        self.repository.as_ref()
    }

    #[must_use]
    pub fn is_root(&self, uri: &str) -> bool {
        self.root.as_deref() == Some(uri)
    }

    #[must_use]
    pub fn is_reserved(&self, uri: &str) -> bool {
        self.reserved.iter().any(|r| r == uri)
    }

    /// Whether `uri` lies under the root. Without a root every URI does.
    #[must_use]
    pub fn in_scope(&self, uri: &str) -> bool {
        self.root.as_deref().map_or(true, |root| uri.starts_with(root))
    }

    /// Methods `resource` answers, in registration order. Used for `Allow`.
    #[must_use]
    pub fn allowed_methods(&self, resource: &Resource) -> Vec<&'static str> {
        let mut allowed = handlers::allowed_methods(resource.kind());
        if self.is_root(resource.uri()) {
            allowed.retain(|m| *m != "DELETE");
        }
        allowed
    }

    /// Run the handler `resource`'s kind registers for `method`.
    ///
    /// # Errors
    ///
    /// `MethodNotAllowed` carrying `method` verbatim when the kind has no
    /// handler; otherwise whatever the handler returns.
    pub fn dispatch(
        &self,
        resource: Resource,
        method: &Method,
        status: u16,
        headers: HeaderVec,
        req: &LdpRequest,
    ) -> Result<LdpResponse, RequestError> {
        let kind = resource.kind();
        let allowed = self.allowed_methods(&resource);
        let handler = handlers::lookup(kind, method).filter(|_| allowed.contains(&method.as_str()));
        let Some(handler) = handler else {
            debug!(method = %method, kind = %kind, uri = %resource.uri(), "no handler registered");
            return Err(RequestError::method_not_allowed(method.as_str(), allowed));
        };
        handler(self, resource, status, headers, req)
    }
}
