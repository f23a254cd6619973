//! Validation rules shared across request payloads.

use validator::ValidationError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;
pub const MAX_POST_CHARS: usize = 280;

/// Validates username format.
///
/// Requirements:
/// - ASCII letters, digits and underscores only
/// - 3-30 characters in length
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.len() < USERNAME_MIN_LEN || username.len() > USERNAME_MAX_LEN {
        return Err(ValidationError::new("username_invalid_length"));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::new("username_invalid_characters"));
    }

    Ok(())
}

/// Validates a new password.
///
/// Requirements:
/// - 8-128 characters
/// - at least one letter and one digit
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(ValidationError::new("password_invalid_length"));
    }
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        return Err(ValidationError::new("password_too_weak"));
    }
    Ok(())
}

/// Post and comment bodies: non-blank, at most 280 characters.
pub fn validate_post_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("content_blank"));
    }
    if content.chars().count() > MAX_POST_CHARS {
        return Err(ValidationError::new("content_too_long"));
    }
    Ok(())
}
