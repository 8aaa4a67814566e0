// SQLite-backed note store
// Async access through a sqlx connection pool; ids are UUID v4 strings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use super::{validate_content, validate_patch, NoteStore, StoreError};
use crate::model::{NewNote, Note, NotePatch};

const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS notes (
        id        TEXT PRIMARY KEY NOT NULL,
        content   TEXT NOT NULL,
        important INTEGER NOT NULL DEFAULT 0,
        date      TEXT NOT NULL
    )
";

#[derive(sqlx::FromRow)]
struct NoteRow {
    id: String,
    content: String,
    important: bool,
    date: DateTime<Utc>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            important: row.important,
            date: row.date,
        }
    }
}

/// Persistent store over a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url` and make sure the notes table exists
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let mut options = SqlitePoolOptions::new().max_connections(max_connections.max(1));
        if url.contains(":memory:") {
            // Every connection to an in-memory database is a fresh database
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = options.connect(url).await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

/// Normalise an id to the canonical hyphenated form used as the key
fn parse_id(id: &str) -> Result<String, StoreError> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| StoreError::InvalidId(id.to_string()))
}

#[async_trait]
impl NoteStore for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Note>, StoreError> {
        let rows = sqlx::query_as::<_, NoteRow>(
            "SELECT id, content, important, date FROM notes ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Note, StoreError> {
        let key = parse_id(id)?;
        sqlx::query_as::<_, NoteRow>("SELECT id, content, important, date FROM notes WHERE id = ?")
            .bind(&key)
            .fetch_optional(&self.pool)
            .await?
            .map(Note::from)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        validate_content(&note.content)?;
        let note = note.into_note(Uuid::new_v4().to_string());

        sqlx::query("INSERT INTO notes (id, content, important, date) VALUES (?, ?, ?, ?)")
            .bind(&note.id)
            .bind(&note.content)
            .bind(note.important)
            .bind(note.date)
            .execute(&self.pool)
            .await?;

        Ok(note)
    }

    async fn update(&self, id: &str, patch: NotePatch) -> Result<Note, StoreError> {
        let key = parse_id(id)?;
        validate_patch(&patch)?;
        if patch.is_empty() {
            return self.get_by_id(&key).await;
        }

        sqlx::query_as::<_, NoteRow>(
            r"
            UPDATE notes
            SET content = COALESCE(?, content),
                important = COALESCE(?, important)
            WHERE id = ?
            RETURNING id, content, important, date
            ",
        )
        .bind(patch.content)
        .bind(patch.important)
        .bind(&key)
        .fetch_optional(&self.pool)
        .await?
        .map(Note::from)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let key = parse_id(id)?;
        sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(&key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    const ABSENT: &str = "5f0c3a52-7f61-4f4b-9a39-0d8bcae5a0f1";

    async fn store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:", 1).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        contract::create_then_get(&store().await).await;
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        contract::list_in_insertion_order(&store().await).await;
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        contract::update_is_partial(&store().await).await;
    }

    #[tokio::test]
    async fn test_update_rejects_empty_content() {
        contract::update_rejects_empty_content(&store().await).await;
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        contract::delete_is_idempotent(&store().await, ABSENT).await;
    }

    #[tokio::test]
    async fn test_malformed_ids() {
        contract::malformed_ids(&store().await, "nonexistent-path-xyz").await;
    }

    #[tokio::test]
    async fn test_update_missing() {
        contract::update_missing(&store().await, ABSENT).await;
    }

    #[tokio::test]
    async fn test_ids_are_uuids() {
        let store = store().await;
        let created = store.create(NewNote::new("uuid please")).await.unwrap();
        assert!(Uuid::parse_str(&created.id).is_ok());

        // Lookup accepts any spelling of the same UUID
        let upper = created.id.to_uppercase();
        assert_eq!(store.get_by_id(&upper).await.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_empty_patch_returns_current_note() {
        let store = store().await;
        let created = store.create(NewNote::new("unchanged")).await.unwrap();
        let same = store
            .update(&created.id, NotePatch::default())
            .await
            .unwrap();
        assert_eq!(same, created);
    }

    #[tokio::test]
    async fn test_persists_across_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("notes.db").display());

        let created = {
            let store = SqliteStore::connect(&url, 2).await.unwrap();
            let note = store.create(NewNote::new("durable")).await.unwrap();
            store.close().await;
            note
        };

        let reopened = SqliteStore::connect(&url, 2).await.unwrap();
        assert_eq!(reopened.get_by_id(&created.id).await.unwrap(), created);
    }
}
