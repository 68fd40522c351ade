use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{NoteRequest, NoteResponse, NoteSummaryResponse, PageDto};
use crate::api::validation::validate_note;
use crate::database::models::NewNote;
use crate::database::page::PageRequest;
use crate::database::NoteStore;
use crate::error::ApiError;

/// Note CRUD scoped to the calling user
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
    latest_limit: usize,
}

fn not_found_message(id: i64, user_id: Uuid) -> String {
    format!("Note not found for id {} and user {}", id, user_id)
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteStore>, latest_limit: usize) -> Self {
        Self { notes, latest_limit }
    }

    pub async fn create(&self, user_id: Uuid, request: NoteRequest) -> Result<NoteResponse, ApiError> {
        validate_note(&request)?;

        let note = self
            .notes
            .insert(NewNote {
                user_id,
                title: request.title,
                content: request.content,
                expires_at: request.expires_at,
            })
            .await?;

        tracing::debug!("Created note {} for user {}", note.id, user_id);
        Ok(note.into())
    }

    pub async fn update(&self, user_id: Uuid, id: i64, request: NoteRequest) -> Result<NoteResponse, ApiError> {
        validate_note(&request)?;

        let mut note = self
            .notes
            .find(id, user_id)
            .await?
            .ok_or_else(|| ApiError::bad_request(not_found_message(id, user_id)))?;

        note.title = request.title;
        note.content = request.content;
        note.expires_at = request.expires_at;

        self.notes
            .update(note)
            .await?
            .map(NoteResponse::from)
            .ok_or_else(|| ApiError::bad_request(not_found_message(id, user_id)))
    }

    pub async fn delete(&self, user_id: Uuid, id: i64) -> Result<(), ApiError> {
        if self.notes.delete(id, user_id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found(not_found_message(id, user_id)))
        }
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: i64) -> Result<NoteResponse, ApiError> {
        tracing::debug!("getting note by id {}", id);
        self.notes
            .find(id, user_id)
            .await?
            .map(NoteResponse::from)
            .ok_or_else(|| ApiError::not_found(not_found_message(id, user_id)))
    }

    pub async fn find_all_valid(
        &self,
        user_id: Uuid,
        request: PageRequest,
    ) -> Result<PageDto<NoteSummaryResponse>, ApiError> {
        let slice = self.notes.find_valid_page(user_id, Utc::now(), &request).await?;
        Ok(slice.map(NoteSummaryResponse::from).into())
    }

    pub async fn find_latest(&self, user_id: Uuid) -> Result<Vec<NoteSummaryResponse>, ApiError> {
        let notes = self.notes.find_latest(user_id, Utc::now(), self.latest_limit).await?;
        Ok(notes.into_iter().map(NoteSummaryResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::page::{SortDirection, SortField};
    use crate::database::MemoryNoteStore;
    use axum::http::StatusCode;

    fn service() -> NoteService {
        NoteService::new(Arc::new(MemoryNoteStore::new()), 2)
    }

    fn request(title: &str) -> NoteRequest {
        NoteRequest {
            title: title.to_string(),
            content: Some("body".to_string()),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_update_find_delete() {
        let service = service();
        let user = Uuid::new_v4();

        let created = service.create(user, request("first")).await.unwrap();
        let updated = service.update(user, created.id, request("renamed")).await.unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(service.find_by_id(user, created.id).await.unwrap().title, "renamed");

        service.delete(user, created.id).await.unwrap();
        let err = service.find_by_id(user, created.id).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_of_missing_note_is_bad_request() {
        let service = service();
        let user = Uuid::new_v4();
        let err = service.update(user, 99, request("x")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), not_found_message(99, user));
    }

    #[tokio::test]
    async fn test_latest_respects_limit() {
        let service = service();
        let user = Uuid::new_v4();
        for i in 0..3 {
            service.create(user, request(&format!("n{}", i))).await.unwrap();
        }
        assert_eq!(service.find_latest(user).await.unwrap().len(), 2);

        let page = service
            .find_all_valid(
                user,
                PageRequest {
                    page: 0,
                    size: 10,
                    sort: SortField::CreatedOn,
                    direction: SortDirection::Desc,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.data.len(), 3);
        assert!(!page.has_next);
    }
}
