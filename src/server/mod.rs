// Server module entry
// Accept loop, connection serving and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

pub use connection::accept_connection;
pub use listener::create_listener;
pub use signal::shutdown_signal;

/// Accept connections until `shutdown` resolves, then drain.
///
/// In-flight connections get `performance.shutdown_timeout` seconds to finish.
pub async fn run<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => break,
        }
    }

    // Stop accepting before draining
    drop(listener);

    let timeout = Duration::from_secs(state.config.performance.shutdown_timeout);
    let unfinished = tokio::time::timeout(timeout, graceful.shutdown())
        .await
        .is_err();
    logger::log_shutdown_complete(unfinished);
}
