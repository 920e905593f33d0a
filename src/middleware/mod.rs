//! # Middleware Module
//!
//! The protocol chain that sits between the HTTP front end and the
//! application logic.
//!
//! ## Stages
//!
//! [`Chain::recommended`] builds the stages in this order, outermost first:
//!
//! 1. [`TracingMiddleware`] opens the per-request span
//! 2. [`ContentNegotiationMiddleware`] serializes graphs to the accepted RDF
//!    media type (`text/turtle` by default)
//! 3. [`ErrorsMiddleware`] turns protocol errors into responses
//! 4. [`ResponsesMiddleware`] reduces a resource instance body to its graph
//!    or bytes
//! 5. [`RequestsMiddleware`] dispatches the request method against the
//!    resource instance the application returned
//!
//! Order matters. Errors raised by the dispatcher are converted by the
//! Errors stage before content negotiation sees the response, and the
//! Responses stage only ever sees what the dispatcher produced.

mod content_negotiation;
mod core;
mod errors;
mod requests;
mod responses;
mod tracing;

pub use self::content_negotiation::{negotiate, ContentNegotiationMiddleware};
pub use self::core::{Application, Chain, Middleware, Next};
pub use self::errors::ErrorsMiddleware;
pub use self::requests::RequestsMiddleware;
pub use self::responses::ResponsesMiddleware;
pub use self::tracing::TracingMiddleware;
