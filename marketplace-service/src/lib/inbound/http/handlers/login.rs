use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::models::Username;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A syntactically invalid username cannot match any account; fail the
    // same way as a wrong password
    let username = Username::new(body.username)
        .map_err(|_| ApiError::Unauthorized("Incorrect username or password".to_string()))?;

    let user = state
        .user_service
        .verify_credentials(&username, &body.password)
        .await
        .map_err(ApiError::from)?;

    let token = state
        .token_service
        .encode(&user.id.to_string(), user.username.as_str())
        .map_err(|e| ApiError::InternalServerError(format!("Failed to create token: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            token,
            username: user.username.as_str().to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub username: String,
}
