use std::io::{self, Read};

use tracing::debug;
use url::Url;

use crate::dispatcher::LdpRequest;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

/// Convert a `tiny_http` request into an [`LdpRequest`] for a server
/// rooted at `base`.
///
/// The query string is dropped: resource URIs never carry one.
///
/// # Errors
///
/// `InvalidInput` for a method `http` cannot represent or a body over
/// [`MAX_BODY_BYTES`]; any error reading the body.
pub fn parse_request(req: &mut tiny_http::Request, base: &Url) -> io::Result<LdpRequest> {
    let method = http::Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let path = req.url().split('?').next().unwrap_or("/").to_string();

    let mut ldp = LdpRequest::new(method, base, &path);
    for header in req.headers() {
        ldp.push_header(header.field.as_str().as_str(), header.value.as_str().to_string());
    }

    let mut body = Vec::new();
    req.as_reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)?;
    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("request body exceeds {MAX_BODY_BYTES} bytes"),
        ));
    }
    ldp.body = body;

    debug!(
        request_id = %ldp.request_id,
        method = %ldp.method,
        uri = %ldp.uri,
        headers = ldp.headers.len(),
        body_len = ldp.body.len(),
        "parsed request"
    );
    Ok(ldp)
}
