use super::{Middleware, Next};
use crate::dispatcher::{Body, Dispatcher, LdpRequest, LdpResponse};
use crate::error::RequestError;

/// Hands a resource instance produced by the application to the
/// dispatcher, which replaces the whole response with the result of the
/// method handler. Responses without an instance pass through.
pub struct RequestsMiddleware {
    dispatcher: Dispatcher,
}

impl RequestsMiddleware {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl Middleware for RequestsMiddleware {
    fn call(&self, req: &LdpRequest, next: Next<'_>) -> Result<LdpResponse, RequestError> {
        let res = next.run(req)?;
        match res.body {
            Body::Resource(resource) => {
                self.dispatcher
                    .dispatch(resource, &req.method, res.status, res.headers, req)
            }
            body => Ok(LdpResponse { body, ..res }),
        }
    }
}
