use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{NewNote, Note, User};
use super::page::{PageRequest, Slice};

/// Errors from the persistence collaborators
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user. Fails with `Conflict` when the email is taken.
    async fn save(&self, user: User) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note and assign its id
    async fn insert(&self, note: NewNote) -> Result<Note, StoreError>;

    /// Replace an existing note owned by `note.user_id`; `None` when absent
    async fn update(&self, note: Note) -> Result<Option<Note>, StoreError>;

    async fn find(&self, id: i64, user_id: Uuid) -> Result<Option<Note>, StoreError>;

    /// Remove a note; `false` when nothing matched
    async fn delete(&self, id: i64, user_id: Uuid) -> Result<bool, StoreError>;

    /// Non-expired notes of a user, one page at a time
    async fn find_valid_page(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        request: &PageRequest,
    ) -> Result<Slice<Note>, StoreError>;

    /// Most recently updated non-expired notes of a user
    async fn find_latest(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Note>, StoreError>;
}
