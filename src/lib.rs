//! Convention-based HTTP dispatcher
//!
//! Requests of the form `{base}/{controller-key}/{action-token}` are routed
//! to a freshly created controller, whose action is found by turning the
//! token into `TitleCaseAction` (`say-hello` → `SayHelloAction`). Plain
//! handlers and static directories can be mounted alongside.
//!
//! ```no_run
//! use rust_dispatcher::controller::{ActionTable, Context, Controller};
//! use rust_dispatcher::error::ActionResult;
//! use rust_dispatcher::Server;
//!
//! struct Hello {
//!     ctx: Context,
//! }
//!
//! impl Hello {
//!     fn index(&mut self) -> ActionResult {
//!         self.ctx.response.render_string("Hello World");
//!         Ok(())
//!     }
//! }
//!
//! impl Controller for Hello {
//!     fn from_context(ctx: Context) -> Self {
//!         Self { ctx }
//!     }
//!     fn into_context(self) -> Context {
//!         self.ctx
//!     }
//!     fn actions() -> ActionTable<Self> {
//!         ActionTable::new().action("IndexAction", Self::index)
//!     }
//! }
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = Server::new();
//! server.set_base_url("test").register_controller::<Hello>("/hello")?;
//! server.run("127.0.0.1:8080").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use config::Config;
pub use controller::{ActionTable, Context, Controller, ResponseWriter};
pub use error::{ActionError, ActionResult, RegistryError, ServerError};
pub use routing::{DispatchOutcome, Router};
pub use server::Server;
