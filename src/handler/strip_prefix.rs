//! Prefix-stripping handler wrapper

use hyper::http::uri::{PathAndQuery, Uri};
use hyper::Request;

use super::{Handler, HandlerFuture};
use crate::http;

/// Removes `prefix` from the request path before calling the inner handler
///
/// Requests whose path does not start with the prefix get a 404.
pub struct StripPrefix<H> {
    prefix: String,
    inner: H,
}

impl<H: Handler> StripPrefix<H> {
    pub fn new(prefix: impl Into<String>, inner: H) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }
}

impl<H: Handler> Handler for StripPrefix<H> {
    fn call(&self, req: Request<()>) -> HandlerFuture {
        match strip_request_prefix(req, &self.prefix) {
            Some(stripped) => self.inner.call(stripped),
            None => Box::pin(async { http::build_default_404_response() }),
        }
    }
}

/// Rewrite the request URI without `prefix`; the remaining path always keeps
/// a leading `/`
fn strip_request_prefix(req: Request<()>, prefix: &str) -> Option<Request<()>> {
    let (mut parts, body) = req.into_parts();

    let rest = parts.uri.path().strip_prefix(prefix)?;
    let path = if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{rest}")
    };
    let path_and_query = match parts.uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    parts.uri = Uri::from_parts(uri_parts).ok()?;

    Some(Request::from_parts(parts, body))
}
