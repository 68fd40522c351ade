pub mod note;
pub mod user;

pub use note::{NewNote, Note};
pub use user::User;
