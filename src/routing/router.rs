//! Frozen routing table: handler bindings first, then the dispatcher

use hyper::{Request, Response};

use super::dispatcher::Dispatcher;
use super::registry::{HandlerBindings, RouteRegistry};
use crate::config::Config;
use crate::http::Body;
use crate::logger;

/// Routing table shared by every connection
///
/// Built once from a [`RouteRegistry`]; read-only afterwards.
pub struct Router {
    config: Config,
    handlers: HandlerBindings,
    dispatcher: Dispatcher,
}

impl Router {
    /// Freeze `registry`; unset `config` fields get their defaults
    pub fn new(config: Config, registry: RouteRegistry) -> Self {
        let config = config.with_defaults();
        let keys: Vec<&str> = registry.controller_keys().collect();
        logger::log_routes_frozen(&keys, registry.handlers().len());
        let (routes, handlers) = registry.into_parts();
        Self {
            dispatcher: Dispatcher::new(config.base_url.clone(), routes),
            handlers,
            config,
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Answer one request
    pub async fn route(&self, req: Request<()>) -> Response<Body> {
        if let Some(handler) = self.handlers.find(req.uri().path()) {
            return handler.call(req).await;
        }
        self.dispatcher.dispatch(req).into_response()
    }
}
