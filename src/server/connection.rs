// Connection handling module
// Serves one accepted TCP connection through the shared router

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::body::{Body as _, Incoming};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, Version};
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;

use crate::http::Body;
use crate::logger::{self, AccessLogEntry};
use crate::routing::Router;

/// Upper bound for the request head, headers included
const MAX_HEADER_BYTES: usize = 1 << 20;

/// Serve `stream` in its own task.
///
/// Reading a request head is bounded by the read timeout. Producing each
/// response is bounded by the write timeout; when it expires the connection
/// is dropped without a response. Keep-alive connections live as long as
/// the client keeps using them.
pub fn spawn_connection(stream: TcpStream, peer_addr: SocketAddr, router: Arc<Router>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let config = router.config();
        let write_timeout = config.write_timeout;

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(config.read_timeout)
            .keep_alive(config.keep_alive)
            .max_buf_size(MAX_HEADER_BYTES);

        let service_router = Arc::clone(&router);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let router = Arc::clone(&service_router);
                async move {
                    let path = req.uri().path().to_string();
                    tokio::time::timeout(write_timeout, handle_request(req, &router, peer_addr))
                        .await
                        .map_err(|elapsed| {
                            logger::log_warning(&format!(
                                "Request {path} from {peer_addr} exceeded {write_timeout:?} write timeout"
                            ));
                            elapsed
                        })
                }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}

/// Route one request; the body is never read
async fn handle_request(
    req: Request<Incoming>,
    router: &Router,
    peer_addr: SocketAddr,
) -> Response<Body> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();
    let req = Request::from_parts(parts, ());

    let entry = logger::access_log_format().map(|_| access_entry(&req, peer_addr));
    let response = router.route(req).await;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry);
    }
    response
}

fn access_entry(req: &Request<()>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version(req.version()).to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method("POST")
            .uri("/test/ct/hello?x=1")
            .header("User-Agent", "curl/8.0")
            .body(())
            .unwrap();
        let entry = access_entry(&req, "10.0.0.7:5555".parse().unwrap());
        assert_eq!(entry.remote_addr, "10.0.0.7");
        assert_eq!(entry.method, "POST");
        assert_eq!(entry.path, "/test/ct/hello");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.referer, None);
        assert_eq!(entry.http_version, "1.1");
    }
}
