use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::CarData;
use crate::domain::car::ports::CarServicePort;
use crate::domain::pagination::PageRequest;
use crate::inbound::http::router::AppState;

const DEFAULT_LIMIT: u64 = 10;

#[derive(Debug, Deserialize)]
pub struct ListCarsQuery {
    page: Option<u64>,
    limit: Option<u64>,
}

pub async fn list_cars(
    State(state): State<AppState>,
    Query(params): Query<ListCarsQuery>,
) -> Result<ApiSuccess<PaginatedCarsData>, ApiError> {
    let request = PageRequest::new(
        params.page.unwrap_or(1),
        params.limit.unwrap_or(DEFAULT_LIMIT),
    )
    .map_err(ApiError::from)?;

    state
        .car_service
        .list_cars(request)
        .await
        .map_err(ApiError::from)
        .map(|result| {
            ApiSuccess::new(
                StatusCode::OK,
                PaginatedCarsData {
                    cars: result.items.iter().map(CarData::from).collect(),
                    page: result.page,
                    total_cars: result.total_items,
                    total_pages: result.total_pages,
                    has_more: result.has_more,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedCarsData {
    pub cars: Vec<CarData>,
    pub page: u64,
    pub total_cars: u64,
    pub total_pages: u64,
    pub has_more: bool,
}
