use super::{Middleware, Next};
use crate::dispatcher::{Body, LdpRequest, LdpResponse};
use crate::error::RequestError;

/// Replaces a resource instance body with what the instance produces for
/// the wire. Status and headers are left alone.
pub struct ResponsesMiddleware;

impl Middleware for ResponsesMiddleware {
    fn call(&self, req: &LdpRequest, next: Next<'_>) -> Result<LdpResponse, RequestError> {
        let mut res = next.run(req)?;
        if res.body.is_resource() {
            if let Body::Resource(resource) = std::mem::replace(&mut res.body, Body::Empty) {
                // the snapshot is consumed here
                res.body = resource.to_response_body();
            }
        }
        Ok(res)
    }
}
