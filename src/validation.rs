//! Input validation and normalization for user bodies.

use std::sync::OnceLock;

use regex::Regex;

use crate::user::{NewUser, UserInput};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Username is required")]
    UsernameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format")]
    InvalidEmail,
}

/// `local@domain.tld`, no whitespace, exactly one `@`. Shape only: no DNS or
/// deliverability checks.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Failed to compile email regex")
    });

    !email.is_empty() && regex.is_match(email)
}

/// Checks required fields and email shape, returning the normalized
/// candidate: username and full name trimmed, email trimmed and lowercased.
/// A blank full name becomes `None`.
pub fn validate(input: UserInput) -> Result<NewUser, ValidationError> {
    let username = non_blank(input.username).ok_or(ValidationError::UsernameRequired)?;
    let email = non_blank(input.email).ok_or(ValidationError::EmailRequired)?;
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(NewUser {
        username,
        email: email.to_lowercase(),
        full_name: non_blank(input.full_name),
    })
}

fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
