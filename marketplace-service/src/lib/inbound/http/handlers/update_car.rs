use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::CarData;
use crate::car::models::CarId;
use crate::car::models::UpdateCarCommand;
use crate::domain::car::ports::CarServicePort;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a car (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateCarRequest {
    pub price: Option<f64>,
    pub description: Option<String>,
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
}

pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCarRequest>,
) -> Result<ApiSuccess<CarData>, ApiError> {
    let car_id =
        CarId::from_string(&id).map_err(|_| ApiError::NotFound(format!("Car {} not found", id)))?;

    let command = UpdateCarCommand {
        price: body.price,
        description: body.description,
        pros: body.pros,
        cons: body.cons,
    }
    .validated()
    .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .car_service
        .update_car(&car_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref car| ApiSuccess::new(StatusCode::OK, car.into()))
}
