use std::sync::Arc;

use anyhow::Context;
use flagforge_server::api::{AppState, create_router};
use flagforge_server::config::ServerConfig;
use flagforge_server::db;
use flagforge_server::repository::{
    SeaOrmChallengeRepository, SeaOrmSubmissionRepository, SeaOrmUserProfileRepository,
};
use flagforge_server::service::CtfService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting flagforge server");
    let config_path =
        std::env::var("FLAGFORGE_CONFIG").unwrap_or_else(|_| "flagforge.toml".to_string());
    info!(path = %config_path, "loading server config");
    let config = ServerConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to load server config from {config_path}"))?;

    let database_url = config.database_url()?;
    let db = db::init_pool_and_migrate(&database_url)
        .await
        .context("failed to connect to database and run migrations")?;
    info!("database ready");

    let challenges = Arc::new(SeaOrmChallengeRepository::new(db.clone()));
    let submissions = Arc::new(SeaOrmSubmissionRepository::new(db.clone()));
    let profiles = Arc::new(SeaOrmUserProfileRepository::new(db));

    db::seed_admins(profiles.as_ref(), &config.admins)
        .await
        .context("failed to seed admin profiles")?;

    let policy = config.attempt_policy();
    info!(?policy, "attempt policy configured");

    let service = CtfService::new(challenges, submissions, profiles)
        .with_policy(policy)
        .with_event_buffer(config.event_buffer_size);
    let state = AppState::new(Arc::new(service)).with_scoreboard_limit(config.scoreboard_limit);

    let app = create_router(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received, stopping server");
        })
        .await
        .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
