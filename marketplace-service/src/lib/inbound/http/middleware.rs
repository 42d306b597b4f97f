use auth::TokenError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Middleware gate for protected routes.
///
/// Extracts the bearer credential, delegates to the token service, and
/// attaches the decoded identity to the request. Performs no business
/// logic; handlers resolve the acting user themselves.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req)?;

    let identity = state.token_service.decode(token).map_err(|e| {
        tracing::warn!("Token validation failed: {}", e);
        match e {
            TokenError::Expired => unauthorized("Token has expired"),
            TokenError::Invalid(_) => unauthorized("Invalid token format or signature"),
            TokenError::Service(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Token decoding error"
                })),
            )
                .into_response(),
        }
    })?;

    let user_id = UserId::from_string(&identity.user_id).map_err(|e| {
        tracing::warn!("Failed to parse user ID from token: {}", e);
        unauthorized("Invalid token format or signature")
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username: identity.username,
    });

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}

fn extract_bearer_token(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("No authentication token provided"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
        })?
        .trim();

    if token.is_empty() {
        return Err(unauthorized("No authentication token provided"));
    }

    Ok(token)
}
