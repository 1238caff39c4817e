// Connection handling module
// Serves one accepted TCP connection on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Hand an accepted connection to a spawned task.
///
/// Requests share nothing mutable, so connections run fully in parallel;
/// a failing connection only ends its own task.
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    logger::log_connection_accepted(&peer_addr);
    let state = Arc::clone(state);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state))),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
