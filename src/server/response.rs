use std::io::Cursor;

use tracing::warn;

use crate::dispatcher::{Body, HeaderVec, LdpResponse};

/// `{"status": "ok"}` with a JSON content type.
pub fn health_response() -> LdpResponse {
    let mut headers = HeaderVec::new();
    headers.push(("Content-Type".into(), "application/json".to_string()));
    let body = serde_json::json!({ "status": "ok" }).to_string();
    LdpResponse::new(200, headers, Body::Bytes(body.into_bytes()))
}

/// Build the `tiny_http` response. Headers `tiny_http` cannot encode are
/// dropped with a warning.
pub fn into_http_response(res: LdpResponse) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let LdpResponse {
        status,
        headers,
        body,
    } = res;
    let mut response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode(status));
    for (name, value) in &headers {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => response.add_header(header),
            Err(()) => warn!(header = %name, "dropping header with invalid value"),
        }
    }
    response
}
