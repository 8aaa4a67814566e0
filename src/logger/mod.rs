//! Logger module
//!
//! Provides logging utilities for the notes server including:
//! - Server lifecycle logging
//! - Per-request logging (method, path, body) before dispatch
//! - Access logging with multiple formats
//! - Error and warning logging
//!
//! Everything is emitted through `tracing`; `init` installs the subscriber.

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::Config;
use std::net::SocketAddr;
use tracing::{error, info, warn};

/// Target used for access log lines, so they can be filtered separately
pub const ACCESS_TARGET: &str = "access";

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        &config.logging.level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, backend: &str) {
    info!("======================================");
    info!("Notes server started successfully");
    info!("Listening on: http://{addr}");
    info!("Notes API: http://{addr}/api/notes");
    info!("Store backend: {backend}");
    info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        info!("Worker threads: {workers}");
    }
    if let Some(ref dir) = config.routes.static_dir {
        info!("Static frontend: {dir}");
    }
    if let Some(ref path) = config.logging.access_log_file {
        info!("Access log: {path}");
    }
    if let Some(ref path) = config.logging.error_log_file {
        info!("Error log: {path}");
    }
    info!("======================================");
}

/// Log an incoming request before it is dispatched
pub fn log_request(method: &str, path: &str, body: &[u8]) {
    info!(
        method,
        path,
        body = %String::from_utf8_lossy(body),
        "request"
    );
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    error!("{message}");
}

pub fn log_warning(message: &str) {
    warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    info!(target: ACCESS_TARGET, "{}", entry.render(format));
}

pub fn log_shutdown_requested(signal: &str) {
    info!("{signal} received, shutting down gracefully");
}

pub fn log_shutdown_complete(unfinished: bool) {
    if unfinished {
        warn!("Shutdown timeout elapsed with connections still open");
    } else {
        info!("All connections closed, server stopped");
    }
}
