//! Application logic at the center of the middleware chain.
//!
//! Maps the request URI to a resource instance. Method semantics are not
//! decided here; the instance is handed outward to the dispatcher.

use http::Method;
use tracing::debug;

use crate::dispatcher::{
    apply_protocol_headers, creation_kind, Body, Dispatcher, HeaderVec, LdpRequest, LdpResponse,
};
use crate::error::RequestError;
use crate::middleware::Application;
use crate::resource::Resource;

/// Looks up the target resource in the dispatcher's repository.
///
/// - outside the root: `404`
/// - stored: `200`, protocol headers, the instance as body
/// - deleted: `410 Gone`
/// - unknown, method `PUT`: a fresh unsaved instance of the requested kind
///   with status `201`, or `409` if the URI is reserved
/// - unknown otherwise: `404`
pub struct LdpApp {
    dispatcher: Dispatcher,
}

impl LdpApp {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl Application for LdpApp {
    fn call(&self, req: &LdpRequest) -> Result<LdpResponse, RequestError> {
        if !self.dispatcher.in_scope(&req.uri) {
            debug!(uri = %req.uri, "outside the root container");
            return Err(RequestError::NotFound(format!("{} not found", req.uri)));
        }
        match self.dispatcher.repository().find(&req.uri) {
            Ok(resource) => {
                let mut headers = HeaderVec::new();
                apply_protocol_headers(&self.dispatcher, &resource, &mut headers);
                Ok(LdpResponse::new(200, headers, Body::Resource(resource)))
            }
            Err(RequestError::NotFound(_)) if req.method == Method::PUT => {
                if self.dispatcher.is_reserved(&req.uri) {
                    return Err(RequestError::Conflict(format!(
                        "{} is reserved by the server",
                        req.uri
                    )));
                }
                let kind = creation_kind(req)?;
                debug!(uri = %req.uri, kind = %kind, "new resource for PUT");
                Ok(LdpResponse::new(
                    201,
                    HeaderVec::new(),
                    Body::Resource(Resource::new(req.uri.as_str(), kind)),
                ))
            }
            Err(err) => Err(err),
        }
    }
}
