// Request and response bodies of the public API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Note, User};
use crate::database::page::Slice;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    #[serde(default)]
    pub title: String,
    pub content: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_on: note.created_on,
            updated_on: note.updated_on,
            expires_at: note.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummaryResponse {
    pub id: i64,
    pub title: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Note> for NoteSummaryResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            created_on: note.created_on,
            updated_on: note.updated_on,
            expires_at: note.expires_at,
        }
    }
}

/// Paged response; counts are only filled when the query computed them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_count: Option<u64>,
    pub has_previous: bool,
    pub has_next: bool,
    pub data: Vec<T>,
}

impl<T> From<Slice<T>> for PageDto<T> {
    fn from(slice: Slice<T>) -> Self {
        Self {
            elements_count: None,
            pages_count: None,
            has_previous: slice.has_previous,
            has_next: slice.has_next,
            data: slice.content,
        }
    }
}
