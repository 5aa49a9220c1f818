//! Routing module
//!
//! - Route registry: controller keys and handler bindings, filled at setup
//! - Dispatcher: `/{key}/{action-token}` resolution onto fresh controllers
//! - Router: the frozen combination served to every connection

mod dispatcher;
mod registry;
mod router;

pub use dispatcher::{
    parse_route_path, DispatchOutcome, Dispatcher, IgnoreReason, RouteMiss, RoutePath,
    FAVICON_PATH,
};
pub use registry::{normalize_path_key, HandlerBindings, RouteRegistry};
pub use router::Router;
