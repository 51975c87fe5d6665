use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use equitare_server::{config::Config, connect_pool, routes, run_migrations, AppState};

const DEFAULT_LOG_FILTER: &str = "equitare_server=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env è opzionale
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env().context("load configuration")?;
    tracing::info!(database_url = %config.database_url, "using database");

    let pool = connect_pool(&config.database_url).await.context("connect to sqlite")?;
    run_migrations(&pool).await.context("run migrations")?;

    let state = Arc::new(AppState::new(pool, &config.jwt_secret, config.token_ttl));
    let app = routes::router(state).layer(routes::cors_layer(&config.cors_origins)?);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("bind tcp listener")?;
    tracing::info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("server shutdown")?;

    Ok(())
}
