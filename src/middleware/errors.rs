use tracing::{debug, info};

use super::{Middleware, Next};
use crate::dispatcher::{LdpRequest, LdpResponse};
use crate::error::RequestError;

/// Converts protocol errors into terminal responses: the error's status,
/// its headers, and its message as the body. Nothing is retried.
pub struct ErrorsMiddleware;

impl Middleware for ErrorsMiddleware {
    fn call(&self, req: &LdpRequest, next: Next<'_>) -> Result<LdpResponse, RequestError> {
        next.run(req).or_else(|err| {
            match &err {
                RequestError::Conflict(_) | RequestError::PreconditionFailed(_) => {
                    info!(status = err.status(), error = %err, "request rejected");
                }
                _ => debug!(status = err.status(), error = %err, "protocol error"),
            }
            Ok(err.into_response())
        })
    }
}
