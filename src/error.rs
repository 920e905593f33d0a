//! Protocol errors raised while resolving and dispatching LDP requests.
//!
//! Every variant answers the same three questions: which HTTP status it maps
//! to, which headers travel with it, and the message that becomes the
//! response body. The `Errors` middleware stage is the only place these are
//! turned into responses; everything below it propagates them with `?`.

use std::fmt;
use std::sync::Arc;

use crate::dispatcher::{Body, HeaderVec, LdpResponse};

/// A typed LDP protocol failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request is malformed (e.g. an unparsable RDF body).
    BadRequest(String),
    /// No resource exists at the request URI.
    NotFound(String),
    /// The resolved resource kind has no handler for `method`.
    MethodNotAllowed {
        /// Method name exactly as received
        method: String,
        /// Methods the resource does handle, used for the `Allow` header
        allow: Vec<String>,
    },
    /// Conflicting interaction models, or no acceptable representation.
    NotAcceptable(String),
    /// The request conflicts with server-managed state.
    Conflict(String),
    /// The resource existed and was deleted.
    Gone(String),
    /// `If-Match` did not match the current entity tag.
    PreconditionFailed(String),
    /// The request body's media type cannot be stored for this kind.
    UnsupportedMediaType(String),
    /// Any other request failure with an explicit status.
    Other {
        status: u16,
        message: String,
        headers: HeaderVec,
    },
}

impl RequestError {
    /// Build a `MethodNotAllowed` error for `method` given the allowed set.
    pub fn method_not_allowed<I, S>(method: &str, allow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RequestError::MethodNotAllowed {
            method: method.to_string(),
            allow: allow.into_iter().map(Into::into).collect(),
        }
    }

    /// HTTP status code carried by this error.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            RequestError::BadRequest(_) => 400,
            RequestError::NotFound(_) => 404,
            RequestError::MethodNotAllowed { .. } => 405,
            RequestError::NotAcceptable(_) => 406,
            RequestError::Conflict(_) => 409,
            RequestError::Gone(_) => 410,
            RequestError::PreconditionFailed(_) => 412,
            RequestError::UnsupportedMediaType(_) => 415,
            RequestError::Other { status, .. } => *status,
        }
    }

    /// Headers that must accompany the error response. Empty unless the
    /// variant carries protocol context (`Allow` for 405).
    #[must_use]
    pub fn headers(&self) -> HeaderVec {
        let mut headers = HeaderVec::new();
        match self {
            RequestError::MethodNotAllowed { allow, .. } => {
                headers.push((Arc::from("Allow"), allow.join(", ")));
            }
            RequestError::Other { headers: extra, .. } => {
                headers.extend(extra.iter().cloned());
            }
            _ => {}
        }
        headers
    }

    /// Message text, used verbatim as the response body.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Convert into the terminal response `(status, headers, [message])`.
    #[must_use]
    pub fn into_response(self) -> LdpResponse {
        LdpResponse::new(
            self.status(),
            self.headers(),
            Body::Bytes(self.message().into_bytes()),
        )
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::BadRequest(msg)
            | RequestError::NotFound(msg)
            | RequestError::NotAcceptable(msg)
            | RequestError::Conflict(msg)
            | RequestError::Gone(msg)
            | RequestError::PreconditionFailed(msg)
            | RequestError::UnsupportedMediaType(msg) => f.write_str(msg),
            RequestError::MethodNotAllowed { method, .. } => {
                write!(f, "Method not allowed: {method}")
            }
            RequestError::Other { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for RequestError {}
