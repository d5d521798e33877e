use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use rollcall::middleware::rate_limit::spawn_limiter_housekeeping;
use rollcall::router::init_router;
use rollcall::state::AppState;
use rollcall::store::PgCredentialStore;
use rollcall_config::{AuthConfig, CorsConfig, RateLimitConfig};
use rollcall_db::{DatabaseConfig, init_db_pool, run_migrations};
use rollcall_observability::{init_metrics, init_tracing};
use tracing::info;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LOG_DIR: &str = "storage/logs";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    init_tracing(&log_dir)?;
    let prometheus = init_metrics()?;

    let auth_config = AuthConfig::from_env().context("invalid auth configuration")?;
    let db_config = DatabaseConfig::from_env()?;

    let pool = init_db_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let state = AppState::new(
        Arc::new(PgCredentialStore::new(pool)),
        &auth_config,
        CorsConfig::from_env(),
        RateLimitConfig::from_env(),
    )
    .with_prometheus(prometheus);

    if let Some(limiter) = &state.auth_limiter {
        spawn_limiter_housekeeping(limiter.clone());
    }

    let app = init_router(state);

    let addr = std::env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "Server running");
    info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
