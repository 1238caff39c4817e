// Server module entry point
// Startup validation, listener ownership and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module gets another name
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::{StartupError, StartupResult};

/// A validated, bound server that has not started accepting yet
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Validate the root directory, then bind the listening socket.
    ///
    /// The root is checked first, so a bad root never leaves a socket
    /// behind. Must be called from within a tokio runtime.
    pub fn bind(config: Config) -> StartupResult<Self> {
        let addr = config.socket_addr()?;
        let state = AppState::new(config)?;
        let listener =
            create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub const fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Serve until `shutdown` resolves, then release the port
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()>,
    {
        start_server_loop(self.listener, self.state, shutdown).await
    }
}
