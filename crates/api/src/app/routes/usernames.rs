use axum::{http::StatusCode, Json};

use crate::app::dto::{CreateUsernameRequest, CreateUsernameResponse};
use crate::app::validation::ValidatedJson;

/// Accepts a validated username request. Nothing is stored yet.
pub async fn create_username(
    ValidatedJson(_body): ValidatedJson<CreateUsernameRequest>,
) -> (StatusCode, Json<CreateUsernameResponse>) {
    (StatusCode::CREATED, Json(CreateUsernameResponse::accepted()))
}
