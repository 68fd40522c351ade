// handlers/protected/notes/mod.rs - Note endpoints

use uuid::Uuid;

use crate::auth::VerifiedIdentity;
use crate::error::ApiError;

pub mod collection; // GET, POST /api/v1/notes
pub mod latest; // GET /api/v1/notes/latest
pub mod record; // GET, PUT, DELETE /api/v1/notes/:id

pub use collection::{notes_get, notes_post};
pub use latest::latest_get;
pub use record::{note_delete, note_get, note_put};

/// Owner id of the authenticated caller
fn caller_id(identity: &VerifiedIdentity) -> Result<Uuid, ApiError> {
    identity
        .user_uuid()
        .ok_or_else(|| ApiError::unauthorized("Invalid Authentication!"))
}
