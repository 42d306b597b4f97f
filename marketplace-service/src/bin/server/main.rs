use std::sync::Arc;

use auth::TokenService;
use marketplace_service::config::Config;
use marketplace_service::domain::car::ports::CarRepository;
use marketplace_service::domain::car::service::CarService;
use marketplace_service::domain::user::service::UserService;
use marketplace_service::inbound::http::router::create_router;
use marketplace_service::outbound::images::HttpImageStore;
use marketplace_service::outbound::notifier::HttpListingNotifier;
use marketplace_service::outbound::repositories::car::PostgresCarRepository;
use marketplace_service::outbound::repositories::user::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketplace_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "marketplace-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    // Fails here when the token secret is missing or empty
    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_expiry_minutes = config.auth.token_expiry_minutes,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_service = Arc::new(TokenService::new(
        config.auth.token_secret.as_bytes(),
        config.auth.token_expiry_minutes,
    ));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let car_repository = Arc::new(PostgresCarRepository::new(pg_pool));
    let image_store = Arc::new(HttpImageStore::new(&config.images));
    let listing_repository: Arc<dyn CarRepository> = car_repository.clone();
    let notifier = Arc::new(HttpListingNotifier::new(&config.notifier, listing_repository));

    let user_service = Arc::new(UserService::new(user_repository));
    let car_service = Arc::new(CarService::new(car_repository, image_store, notifier));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, car_service, token_service);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
