//! Credential validation, applied before any network call.

use crate::error::{CatalogueError, Result};
use crate::types::Credentials;

/// Minimum username length (in characters).
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Minimum password length (in characters).
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validates signup/login credentials.
///
/// Rules:
/// - Neither field may be empty or whitespace-only
/// - Username must have at least MIN_USERNAME_LENGTH characters after trimming
/// - Password must have at least MIN_PASSWORD_LENGTH characters
/// - Username must not contain whitespace or control characters
pub fn validate_credentials(credentials: &Credentials) -> Result<()> {
    let username = credentials.username.trim();

    if username.is_empty() || credentials.password.trim().is_empty() {
        return Err(CatalogueError::InvalidCredentials(
            "username and password are required".to_string(),
        ));
    }

    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(CatalogueError::InvalidCredentials(format!(
            "username must be at least {MIN_USERNAME_LENGTH} characters"
        )));
    }

    if credentials.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CatalogueError::InvalidCredentials(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(CatalogueError::InvalidCredentials(
            "username cannot contain spaces or control characters".to_string(),
        ));
    }

    Ok(())
}
