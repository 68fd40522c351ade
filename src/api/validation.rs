// Field validation for request bodies. Each check yields the message
// reported under the field's name in the error details.
use std::collections::BTreeMap;

use super::dto::{AuthRequest, NoteRequest, RegisterRequest};
use crate::error::ApiError;

pub const NAME_MESSAGE: &str = "Name should have at least 2 characters";
pub const EMAIL_MESSAGE: &str = "Email should be valid";
pub const PASSWORD_MESSAGE: &str = "Password must contain at least one uppercase letter, one lowercase letter, one digit, and one special character";
pub const TITLE_MESSAGE: &str = "Title must not be blank";

const PASSWORD_SPECIALS: &str = "@$!%*?&";

#[derive(Debug, Default)]
struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    fn check(&mut self, field: &str, ok: bool, message: &str) {
        if !ok {
            self.0.insert(field.to_string(), message.to_string());
        }
    }

    fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(self.0))
        }
    }
}

pub fn validate_register(request: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::default();
    errors.check("name", request.name.trim().chars().count() >= 2, NAME_MESSAGE);
    errors.check("email", is_valid_email(&request.email), EMAIL_MESSAGE);
    errors.check("password", is_strong_password(&request.password), PASSWORD_MESSAGE);
    errors.into_result()
}

pub fn validate_login(request: &AuthRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::default();
    errors.check("email", is_valid_email(&request.email), EMAIL_MESSAGE);
    errors.check("password", is_strong_password(&request.password), PASSWORD_MESSAGE);
    errors.into_result()
}

pub fn validate_note(request: &NoteRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::default();
    errors.check("title", !request.title.trim().is_empty(), TITLE_MESSAGE);
    errors.into_result()
}

/// `local@domain.tld`, no whitespace, exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// 8 to 20 characters from letters, digits and `@$!%*?&`, with at least one
/// of each class
pub fn is_strong_password(password: &str) -> bool {
    let length = password.chars().count();
    if !(8..=20).contains(&length) {
        return false;
    }
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));

    allowed
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}
