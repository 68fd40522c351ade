pub mod memory;
pub mod models;
pub mod page;
pub mod repository;

pub use memory::{MemoryNoteStore, MemoryUserStore};
pub use repository::{NoteStore, StoreError, UserStore};
