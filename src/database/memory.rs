use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{NewNote, Note, User};
use super::page::{PageRequest, Slice, SortDirection, SortField};
use super::repository::{NoteStore, StoreError, UserStore};

/// Users keyed by lower-cased email
#[derive(Debug, Default, Clone)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn save(&self, user: User) -> Result<User, StoreError> {
        let key = user.email.to_lowercase();
        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(StoreError::Conflict(format!("email {} already registered", user.email)));
        }
        users.insert(key, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&email.to_lowercase()).cloned())
    }
}

#[derive(Debug, Default)]
struct NoteTable {
    next_id: i64,
    rows: HashMap<i64, Note>,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryNoteStore {
    table: Arc<RwLock<NoteTable>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn valid_notes(&self, user_id: Uuid, now: DateTime<Utc>) -> Vec<Note> {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .filter(|note| note.user_id == user_id && note.is_valid_at(now))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, note: NewNote) -> Result<Note, StoreError> {
        let now = Utc::now();
        let mut table = self.table.write().await;
        table.next_id += 1;
        let stored = Note {
            id: table.next_id,
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            created_on: now,
            updated_on: now,
            expires_at: note.expires_at,
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, note: Note) -> Result<Option<Note>, StoreError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&note.id) {
            Some(existing) if existing.user_id == note.user_id => {
                existing.title = note.title;
                existing.content = note.content;
                existing.expires_at = note.expires_at;
                existing.updated_on = Utc::now();
                Ok(Some(existing.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find(&self, id: i64, user_id: Uuid) -> Result<Option<Note>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).filter(|note| note.user_id == user_id).cloned())
    }

    async fn delete(&self, id: i64, user_id: Uuid) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        let owned = table.rows.get(&id).is_some_and(|note| note.user_id == user_id);
        if owned {
            table.rows.remove(&id);
        }
        Ok(owned)
    }

    async fn find_valid_page(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        request: &PageRequest,
    ) -> Result<Slice<Note>, StoreError> {
        let mut notes = self.valid_notes(user_id, now).await;
        request.sort_notes(&mut notes);
        Ok(Slice::from_ordered(notes, request))
    }

    async fn find_latest(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Note>, StoreError> {
        let mut notes = self.valid_notes(user_id, now).await;
        let request = PageRequest {
            page: 0,
            size: limit,
            sort: SortField::UpdatedOn,
            direction: SortDirection::Desc,
        };
        request.sort_notes(&mut notes);
        notes.truncate(limit);
        Ok(notes)
    }
}
