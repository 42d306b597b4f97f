use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::CarData;
use crate::car::models::CarId;
use crate::domain::car::ports::CarServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<CarData>, ApiError> {
    // A malformed id cannot name any record: 404, not 400
    let car_id =
        CarId::from_string(&id).map_err(|_| ApiError::NotFound(format!("Car {} not found", id)))?;

    state
        .car_service
        .get_car(&car_id)
        .await
        .map_err(ApiError::from)
        .map(|ref car| ApiSuccess::new(StatusCode::OK, car.into()))
}
