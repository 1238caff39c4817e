// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop owning the listening socket.
///
/// Accept errors (e.g. running out of file descriptors) are logged and the
/// loop keeps going. The listener is dropped, and the port released, as soon
/// as `shutdown` completes. Connections already handed off finish on their
/// own tasks.
pub async fn start_server_loop<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    let local_addr = listener.local_addr()?;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_shutdown(&local_addr);
    Ok(())
}
