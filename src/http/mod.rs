//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the notes API.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_common_headers, build_empty_response, build_file_response, build_health_response,
    build_preflight_response,
};
