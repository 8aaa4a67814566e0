//! Notes server
//!
//! A JSON REST backend for short text notes served over hyper, with a
//! pluggable note store (SQLite or in-memory) and an optional static
//! frontend.

pub mod api;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod model;
pub mod server;
pub mod store;
