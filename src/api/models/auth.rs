//! API models and input validation for register/login.

use crate::api::models::users::{CurrentUser, UserResponse};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registration payload
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Structural validation; does not touch the database.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().len() < 2 {
            return Err(Error::validation("Name must be at least 2 characters"));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(Error::validation("Invalid email format"));
        }
        if !is_strong_password(&self.password) {
            return Err(Error::validation(
                "Password must be at least 8 characters and include uppercase, lowercase, number and special character",
            ));
        }
        Ok(())
    }
}

/// Login payload
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: CurrentUser,
}

/// Canonical form for stored emails: trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain, no whitespace
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// At least 8 chars with uppercase, lowercase, digit and a special character
fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric())
}
