use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

use super::request::parse_request;
use super::response::into_http_response;
use super::service::LdpService;
use crate::error::RequestError;

/// HTTP front end: a `tiny_http` listener drained by a fixed set of worker
/// threads, each running requests through the [`LdpService`].
pub struct HttpServer {
    service: LdpService,
    workers: usize,
}

/// Handle to a running HTTP server
///
/// Provides methods for waiting until the server is ready, stopping it gracefully,
/// or joining the worker threads.
pub struct ServerHandle {
    addr: SocketAddr,
    server: Arc<tiny_http::Server>,
    workers: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    /// Address the listener is bound to (useful after binding port 0).
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to be ready to accept connections
    ///
    /// Polls the server address by attempting TCP connections until successful.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` error if the server doesn't become ready within ~250ms (50 attempts × 5ms).
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop accepting requests and wait for every worker to finish.
    pub fn stop(self) {
        for _ in &self.workers {
            self.server.unblock();
        }
        for worker in self.workers {
            if let Err(panic) = worker.join() {
                warn!(addr = %self.addr, panic = %panic_message(panic.as_ref()), "worker panicked");
            }
        }
        info!(addr = %self.addr, "server stopped");
    }

    /// Block until every worker exits.
    ///
    /// # Errors
    ///
    /// Returns the panic payload of the first worker that panicked.
    pub fn join(self) -> thread::Result<()> {
        let mut result = Ok(());
        for worker in self.workers {
            if let Err(panic) = worker.join() {
                if result.is_ok() {
                    result = Err(panic);
                }
            }
        }
        result
    }
}

impl HttpServer {
    #[must_use]
    pub fn new(service: LdpService, workers: usize) -> Self {
        Self {
            service,
            workers: workers.max(1),
        }
    }

    /// Start the HTTP server on the given address
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let server = tiny_http::Server::http(addr).map_err(io::Error::other)?;
        let bound = server.server_addr().to_ip().unwrap_or(addr);
        let server = Arc::new(server);

        let workers = (0..self.workers)
            .map(|id| {
                let server = Arc::clone(&server);
                let service = self.service.clone();
                thread::Builder::new()
                    .name(format!("ldp-worker-{id}"))
                    .spawn(move || serve(&server, &service))
            })
            .collect::<io::Result<Vec<_>>>()?;

        info!(addr = %bound, workers = self.workers, base_uri = %self.service.base(), "server listening");
        Ok(ServerHandle {
            addr: bound,
            server,
            workers,
        })
    }
}

fn serve(server: &tiny_http::Server, service: &LdpService) {
    for mut request in server.incoming_requests() {
        let response = match parse_request(&mut request, service.base()) {
            Ok(req) => service.handle(&req),
            Err(err) => {
                warn!(error = %err, url = %request.url(), "rejecting unreadable request");
                RequestError::BadRequest(err.to_string()).into_response()
            }
        };
        if let Err(err) = request.respond(into_http_response(response)) {
            warn!(error = %err, "failed to write response");
        }
    }
}

/// Text of a panic payload, for logging.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload = thread::spawn(|| panic!("worker exploded")).join().unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "worker exploded");
        let payload = thread::spawn(|| std::panic::panic_any(7_u8)).join().unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
