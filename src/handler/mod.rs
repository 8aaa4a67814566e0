//! Request handler module
//!
//! Responsible for request routing dispatch: the notes API, health probes and
//! the bundled frontend.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
