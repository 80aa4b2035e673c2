use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use quickex_core::Username;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /v1/username`.
///
/// This is the extension point for username creation: add fields and their
/// `#[validate(...)]` rules here. Unknown fields are rejected.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUsernameRequest {
    #[validate(
        required(message = "username is required"),
        custom(function = "not_blank_username")
    )]
    pub username: Option<String>,
}

fn not_blank_username(raw: &str) -> Result<(), ValidationError> {
    Username::parse(raw).map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new("not_blank");
        err.message = Some(Cow::Owned(e.reason().to_string()));
        err
    })
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUsernameResponse {
    pub ok: bool,
}

impl CreateUsernameResponse {
    pub fn accepted() -> Self {
        Self { ok: true }
    }
}
