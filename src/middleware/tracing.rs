use std::time::Instant;

use tracing::{field, info_span, warn};

use super::{Middleware, Next};
use crate::dispatcher::{LdpRequest, LdpResponse};
use crate::error::RequestError;

/// Opens a `request` span around the rest of the chain and records the
/// final status and latency on it.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn call(&self, req: &LdpRequest, next: Next<'_>) -> Result<LdpResponse, RequestError> {
        let span = info_span!(
            "request",
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            status = field::Empty,
            latency_ms = field::Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();

        let result = next.run(req);

        let status = match &result {
            Ok(res) => res.status,
            Err(err) => err.status(),
        };
        span.record("status", status);
        span.record("latency_ms", start.elapsed().as_millis() as u64);
        if status >= 500 {
            warn!(status, "request failed");
        }
        result
    }
}
