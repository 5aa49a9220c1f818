// Server module entry point
// Setup-time builder, accept loop and graceful shutdown

mod connection;
mod listener;
mod signal;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{normalize_base_url, Config};
use crate::controller::Controller;
use crate::error::{RegistryError, ServerError};
use crate::handler::Handler;
use crate::logger;
use crate::routing::{RouteRegistry, Router};

pub use listener::{bind_listener, resolve_addr};
pub use signal::shutdown_signal;

/// Dispatcher server under construction
///
/// Registration and configuration happen here; [`Server::into_router`]
/// freezes everything into the [`Router`] that connections share.
///
/// ```no_run
/// use rust_dispatcher::Server;
///
/// # async fn demo() -> Result<(), rust_dispatcher::error::ServerError> {
/// let mut server = Server::new();
/// server.set_base_url("api").register_static_route("/assets", "public");
/// server.run("127.0.0.1:8080").await
/// # }
/// ```
#[derive(Default)]
pub struct Server {
    config: Config,
    registry: RouteRegistry,
}

impl Server {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL; `"test"`, `"/test"` and `"test/"` are equivalent
    pub fn set_base_url(&mut self, base_url: &str) -> &mut Self {
        self.config.base_url = normalize_base_url(base_url);
        self
    }

    /// Replace the whole config; zero timeouts and an empty base URL stay unset
    pub fn set_config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn register_controller<C: Controller>(
        &mut self,
        path: &str,
    ) -> Result<&mut Self, RegistryError> {
        self.registry.register_controller::<C>(path)?;
        Ok(self)
    }

    pub fn register_handler<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.registry.register_handler(pattern, handler);
        self
    }

    pub fn register_static_route(
        &mut self,
        prefix: &str,
        directory: impl Into<PathBuf>,
    ) -> &mut Self {
        self.registry.register_static_route(prefix, directory);
        self
    }

    /// Apply config defaults and freeze the routing table
    pub fn into_router(self) -> Router {
        Router::new(self.config, self.registry)
    }

    /// Bind `addr` and serve until SIGINT or SIGTERM
    pub async fn run(self, addr: &str) -> Result<(), ServerError> {
        let addr = resolve_addr(addr).await?;
        let listener = bind_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve connections from `listener` until `shutdown` resolves
    ///
    /// In-flight connections keep running in their own tasks.
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        let router = Arc::new(self.into_router());
        logger::log_server_start(&local_addr, router.config());

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        connection::spawn_connection(stream, peer_addr, Arc::clone(&router));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                },
                () = &mut shutdown => break,
            }
        }

        logger::log_shutdown(&local_addr);
        Ok(())
    }
}
