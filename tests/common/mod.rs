#![allow(dead_code)]

use std::sync::Arc;

use http::Method;
use ldp_server::dispatcher::{LdpRequest, LdpResponse};
use ldp_server::repository::{MemoryRepository, Repository};
use ldp_server::server::LdpService;
use url::Url;

pub const BASE: &str = "http://localhost/";

pub const LDP_RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
pub const LDP_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#RDFSource";
pub const LDP_CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
pub const LDP_BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
pub const LDP_DIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#DirectContainer";
pub const LDP_INDIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#IndirectContainer";
pub const LDP_NON_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#NonRDFSource";

pub fn base() -> Url {
    Url::parse(BASE).unwrap()
}

/// `<uri>; rel="type"`
pub fn type_link(uri: &str) -> String {
    format!("<{uri}>; rel=\"type\"")
}

pub fn request(method: Method, path: &str) -> LdpRequest {
    LdpRequest::new(method, &base(), path)
}

/// A service over a fresh repository holding only the root container.
pub fn service() -> (LdpService, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::with_root(BASE));
    let shared: Arc<dyn Repository> = Arc::clone(&repo) as Arc<dyn Repository>;
    let service = LdpService::new(shared, base(), "text/turtle");
    (service, repo)
}

pub fn body_text(res: LdpResponse) -> String {
    String::from_utf8(res.body.into_bytes()).unwrap()
}

/// POST a Turtle document to `container_path` with a `Slug`, returning the
/// response.
pub fn post_turtle(
    service: &LdpService,
    container_path: &str,
    slug: &str,
    links: &[&str],
    turtle: &str,
) -> LdpResponse {
    let mut req = request(Method::POST, container_path)
        .with_header("Content-Type", "text/turtle")
        .with_header("Slug", slug)
        .with_body(turtle);
    for link in links {
        req = req.with_header("Link", type_link(link));
    }
    service.handle(&req)
}

pub mod raw {
    use std::collections::HashMap;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Write a raw HTTP/1.1 request and read until the server closes the
    /// connection or goes quiet.
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {e:?}"),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Split a raw response into status, lowercased headers, and body.
    pub fn parse_parts(resp: &str) -> (u16, HashMap<String, String>, String) {
        let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let headers = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();
        (status, headers, body.to_string())
    }
}

/// Start an HTTP server on an ephemeral port over a fresh repository.
pub fn start_server() -> (ldp_server::server::ServerHandle, Arc<MemoryRepository>) {
    let (service, repo) = service();
    let handle = ldp_server::server::HttpServer::new(service, 2)
        .start("127.0.0.1:0")
        .unwrap();
    handle.wait_ready().unwrap();
    (handle, repo)
}
