//! API request/response models, separate from the database models.

use serde::Serialize;
use utoipa::ToSchema;

pub mod auth;
pub mod series;
pub mod users;

/// Bare `{message}` envelope used by delete responses
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
