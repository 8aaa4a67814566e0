// In-process note store
// Notes live in an ordered list owned by the store; nothing survives a restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{validate_content, validate_patch, NoteStore, StoreError};
use crate::model::{NewNote, Note, NotePatch};

/// Non-persistent store with integer ids (`max(existing) + 1`)
#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: RwLock<Vec<Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with notes, keeping their ids
    #[cfg(test)]
    pub(crate) fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: RwLock::new(notes),
        }
    }
}

/// Ids are decimal integers; anything else is malformed
fn parse_id(id: &str) -> Result<u64, StoreError> {
    id.parse::<u64>()
        .map_err(|_| StoreError::InvalidId(id.to_string()))
}

fn next_id(notes: &[Note]) -> Result<u64, StoreError> {
    match notes.iter().filter_map(|n| n.id.parse::<u64>().ok()).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted),
    }
}

fn position(notes: &[Note], id: u64) -> Option<usize> {
    notes
        .iter()
        .position(|n| n.id.parse::<u64>().ok() == Some(id))
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Note>, StoreError> {
        Ok(self.notes.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Note, StoreError> {
        let key = parse_id(id)?;
        let notes = self.notes.read().await;
        position(&notes, key)
            .map(|i| notes[i].clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        validate_content(&note.content)?;
        let mut notes = self.notes.write().await;
        let note = note.into_note(next_id(&notes)?.to_string());
        notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: &str, patch: NotePatch) -> Result<Note, StoreError> {
        let key = parse_id(id)?;
        validate_patch(&patch)?;
        let mut notes = self.notes.write().await;
        let index = position(&notes, key).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply(&mut notes[index]);
        Ok(notes[index].clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let key = parse_id(id)?;
        let mut notes = self.notes.write().await;
        if let Some(index) = position(&notes, key) {
            notes.remove(index);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[tokio::test]
    async fn test_create_then_get() {
        contract::create_then_get(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        contract::list_in_insertion_order(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        contract::update_is_partial(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_update_rejects_empty_content() {
        contract::update_rejects_empty_content(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        contract::delete_is_idempotent(&MemoryStore::new(), "9999").await;
    }

    #[tokio::test]
    async fn test_malformed_ids() {
        contract::malformed_ids(&MemoryStore::new(), "not-a-number").await;
    }

    #[tokio::test]
    async fn test_update_missing() {
        contract::update_missing(&MemoryStore::new(), "42").await;
    }

    #[tokio::test]
    async fn test_ids_continue_after_highest() {
        let seeded = vec![
            NewNote::new("HTML is easy").into_note("1".to_string()),
            NewNote::new("Browser can execute only JavaScript").into_note("3".to_string()),
        ];
        let store = MemoryStore::with_notes(seeded);

        let created = store.create(NewNote::new("GET and POST")).await.unwrap();
        assert_eq!(created.id, "4");

        store.delete("4").await.unwrap();
        store.delete("3").await.unwrap();
        let again = store.create(NewNote::new("again")).await.unwrap();
        assert_eq!(again.id, "2");
    }

    #[tokio::test]
    async fn test_create_fails_when_ids_run_out() {
        let seeded = vec![NewNote::new("last").into_note(u64::MAX.to_string())];
        let store = MemoryStore::with_notes(seeded);

        let err = store.create(NewNote::new("one too many")).await.unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_first_id_is_one() {
        let store = MemoryStore::new();
        let created = store.create(NewNote::new("first")).await.unwrap();
        assert_eq!(created.id, "1");
    }
}
