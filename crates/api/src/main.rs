use std::net::SocketAddr;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::app::build_router;
use api::auth::AuthConfig;
use api::config::{DatabaseConfig, ServerConfig};
use api::gql::build_schema;
use api::services::spawn_expiry_service;
use api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_config = DatabaseConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(Some(Duration::from_secs(600)))
        .max_lifetime(Some(Duration::from_secs(1800)))
        .connect(&db_config.url)
        .await?;
    tracing::info!(
        "Connected to Postgres with max {} connections",
        db_config.max_connections
    );

    if db_config.skip_migrations {
        tracing::info!("Skipping database migrations (SKIP_MIGRATIONS=true)");
    } else {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../../migrations").run(&pool).await?;
        tracing::info!("Database migrations completed successfully");
    }

    let port = server_config.port;
    let state = AppState::with_config(pool, auth_config, server_config);

    let schema = build_schema(state.clone());

    let _expiry_handle = spawn_expiry_service(state.clone());
    tracing::info!(
        interval_secs = state.server_config().expiry_interval.as_secs(),
        "Class expiry service started"
    );

    let app = build_router(state, schema);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
