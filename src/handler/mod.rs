//! Custom request handlers
//!
//! Handlers are bound to path patterns and consulted before the controller
//! dispatcher. Static file serving is one of them.

pub mod static_files;
mod strip_prefix;

use std::future::Future;
use std::pin::Pin;

use hyper::{Request, Response};

use crate::http::Body;

pub use static_files::FileServer;
pub use strip_prefix::StripPrefix;

/// Boxed response future returned by [`Handler::call`]
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response<Body>> + Send + 'static>>;

/// Something that answers a request on its own
///
/// Implemented for async closures taking the request head.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<()>) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request<()>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response<Body>> + Send + 'static,
{
    fn call(&self, req: Request<()>) -> HandlerFuture {
        Box::pin(self(req))
    }
}
