//! Controllers
//!
//! A controller is a plain struct built fresh for every matched request from
//! a [`Context`]: the request head, its query parameters, and a
//! [`ResponseWriter`]. Its actions are listed once, at registration time, in
//! an [`ActionTable`].

mod action;
mod writer;

use hyper::Request;

use crate::http::QueryParams;

pub use action::{action_name, is_reachable_action_name, Action, ActionTable, ACTION_SUFFIX};
pub use writer::{ResponseWriter, APPLICATION_JSON_UTF8, TEXT_PLAIN_UTF8};

/// Per-request state injected into every controller
#[derive(Debug)]
pub struct Context {
    pub request: Request<()>,
    pub params: QueryParams,
    pub response: ResponseWriter,
}

impl Context {
    /// Build the context for `request`, parsing its query string
    pub fn new(request: Request<()>) -> Self {
        let params = QueryParams::parse(request.uri().query());
        Self {
            request,
            params,
            response: ResponseWriter::new(),
        }
    }
}

/// A resource whose actions are reachable as `/{key}/{action-token}`
///
/// ```
/// use rust_dispatcher::controller::{ActionTable, Context, Controller};
/// use rust_dispatcher::error::ActionResult;
///
/// struct Greeter {
///     ctx: Context,
/// }
///
/// impl Greeter {
///     fn say_hello(&mut self) -> ActionResult {
///         let name = self.ctx.params.get("name").unwrap_or("world").to_string();
///         self.ctx.response.render_string(&format!("Hello {name}"));
///         Ok(())
///     }
/// }
///
/// impl Controller for Greeter {
///     fn from_context(ctx: Context) -> Self {
///         Self { ctx }
///     }
///
///     fn into_context(self) -> Context {
///         self.ctx
///     }
///
///     fn actions() -> ActionTable<Self> {
///         ActionTable::new().action("SayHelloAction", Self::say_hello)
///     }
/// }
/// ```
pub trait Controller: Sized + 'static {
    /// Construct the per-request instance
    fn from_context(ctx: Context) -> Self;

    /// Give the context back once the action has run
    fn into_context(self) -> Context;

    /// Actions exposed by this controller, read once at registration
    fn actions() -> ActionTable<Self>;
}
