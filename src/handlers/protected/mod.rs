// handlers/protected/mod.rs - Handlers behind the JWT authentication gate
//
// The gate stores a VerifiedIdentity in the request extensions; handlers take
// it as an extractor argument, which answers 401 when it is absent.

pub mod notes; // /api/v1/notes/** - note CRUD, rate limited
