// Connection handling module
// Accepts a TCP connection and serves it with hyper's HTTP/1 implementation

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `graceful` - Shutdown watcher the connection registers with
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    if let Err(e) = stream.set_nodelay(true) {
        logger::log_warning(&format!("Failed to set TCP_NODELAY for {peer_addr}: {e}"));
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        graceful,
    );
}

/// Serve a single connection in a spawned task.
///
/// The connection is bounded by `max(read_timeout, write_timeout)` and the
/// counter is decremented when it ends.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    let io = TokioIo::new(stream);

    let performance = &state.config.performance;
    let timeout_duration = Duration::from_secs(std::cmp::max(
        performance.read_timeout,
        performance.write_timeout,
    ));

    let mut builder = http1::Builder::new();
    builder.keep_alive(performance.keep_alive_timeout > 0);

    let service_state = Arc::clone(&state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
    );
    let conn = graceful.watch(conn);

    tokio::spawn(async move {
        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
