use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_car::create_car;
use super::handlers::delete_car::delete_car;
use super::handlers::get_car::get_car;
use super::handlers::list_cars::list_cars;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::register::register;
use super::handlers::update_car::update_car;
use super::middleware::authenticate as auth_middleware;
use crate::domain::car::service::CarService;
use crate::domain::user::service::UserService;
use crate::outbound::images::HttpImageStore;
use crate::outbound::notifier::HttpListingNotifier;
use crate::outbound::repositories::car::PostgresCarRepository;
use crate::outbound::repositories::user::PostgresUserRepository;

// Multipart bodies carry up to a 5 MiB image plus text fields
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository>>,
    pub car_service:
        Arc<CarService<PostgresCarRepository, HttpImageStore, HttpListingNotifier>>,
    pub token_service: Arc<TokenService>,
}

pub fn create_router(
    user_service: Arc<UserService<PostgresUserRepository>>,
    car_service: Arc<CarService<PostgresCarRepository, HttpImageStore, HttpListingNotifier>>,
    token_service: Arc<TokenService>,
) -> Router {
    let state = AppState {
        user_service,
        car_service,
        token_service,
    };

    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/cars", get(list_cars))
        .route("/cars/:id", get(get_car));

    let protected_routes = Router::new()
        .route("/me", get(me))
        .route("/cars", post(create_car))
        .route("/cars/:id", put(update_car))
        .route("/cars/:id", delete(delete_car))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
