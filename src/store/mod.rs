//! Note store module
//!
//! Defines the `NoteStore` contract and its two backends:
//! - `SqliteStore` persists notes through an async `sqlx` pool
//! - `MemoryStore` keeps notes in process (non-persistent)
//!
//! The backend is chosen at startup from `store.backend`.

mod memory;
mod sqlite;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};
use crate::model::{NewNote, Note, NotePatch};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Failures raised by a store operation
#[derive(Error, Debug)]
pub enum StoreError {
    /// The id is not syntactically valid for this backend
    #[error("malformatted id: {0}")]
    InvalidId(String),

    #[error("note not found: {0}")]
    NotFound(String),

    /// The write would leave a note violating a constraint
    #[error("{0}")]
    ValidationFailed(String),

    /// Every id the backend can issue is taken
    #[error("note ids exhausted")]
    IdsExhausted,

    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// CRUD operations over the note collection
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes in store-native order
    async fn list_all(&self) -> Result<Vec<Note>, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<Note, StoreError>;

    /// Persist a new note and return it with its generated id
    async fn create(&self, note: NewNote) -> Result<Note, StoreError>;

    /// Apply a partial update; `id` and `date` are never touched
    async fn update(&self, id: &str, patch: NotePatch) -> Result<Note, StoreError>;

    /// Remove the note if present. Deleting an absent id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Check that the backend can serve requests
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release backend resources; later calls fail with `Unavailable`
    async fn close(&self) {}

    fn backend(&self) -> &'static str;
}

/// Open the backend selected by configuration
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn NoteStore>, StoreError> {
    match config.backend {
        StoreBackend::Sqlite => {
            let store = SqliteStore::connect(&config.url, config.max_connections).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Content must be present and non-empty on every persisted note
fn validate_content(content: &str) -> Result<(), StoreError> {
    if content.is_empty() {
        return Err(StoreError::ValidationFailed(
            "content must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_patch(patch: &NotePatch) -> Result<(), StoreError> {
    patch.content.as_deref().map_or(Ok(()), validate_content)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content() {
        assert!(validate_content("a").is_ok());
        assert!(matches!(
            validate_content(""),
            Err(StoreError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_validate_patch_without_content() {
        assert!(validate_patch(&NotePatch::default()).is_ok());
    }

    #[tokio::test]
    async fn test_open_memory_backend() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            url: String::new(),
            max_connections: 1,
        };
        let store = open(&config).await.unwrap();
        assert_eq!(store.backend(), "memory");
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_sqlite_backend() {
        let config = StoreConfig {
            backend: StoreBackend::Sqlite,
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        let store = open(&config).await.unwrap();
        assert_eq!(store.backend(), "sqlite");
        store.ping().await.unwrap();
    }
}
