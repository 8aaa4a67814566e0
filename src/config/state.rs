// Application state module
// Shared, read-only state handed to every request

use std::sync::Arc;

use super::types::Config;
use crate::store::NoteStore;

/// Application state
///
/// Built once at startup; requests only read from it. The store handle is the
/// single piece of state shared between concurrent requests.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn NoteStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn NoteStore>) -> Self {
        Self { config, store }
    }
}
