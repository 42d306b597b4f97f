use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::car::models::CarId;
use crate::domain::car::ports::CarServicePort;
use crate::inbound::http::router::AppState;

pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let car_id =
        CarId::from_string(&id).map_err(|_| ApiError::NotFound(format!("Car {} not found", id)))?;

    state
        .car_service
        .delete_car(&car_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
