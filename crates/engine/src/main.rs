//! Worldkeeper Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use worldkeeper_engine::config::EngineConfig;
use worldkeeper_engine::infrastructure::{jobs, sqlite};
use worldkeeper_engine::{api, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` files live at the repo root, not next to the crate.
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worldkeeper_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Worldkeeper Engine");

    let config = EngineConfig::from_env();

    tracing::info!(path = %config.database_path, "Opening world database");
    let pool = sqlite::open(&config.database_path).await?;
    let repositories = sqlite::SqliteRepositories::new(pool);

    let app = Arc::new(App::new(repositories.into(), config.lifecycle));

    tracing::info!(
        idle_period_ms = config.idle_sweep_period.as_millis() as u64,
        dead_period_ms = config.dead_sweep_period.as_millis() as u64,
        "Starting lifecycle sweeps"
    );
    jobs::spawn_idle_sweep(app.clone(), config.idle_sweep_period);
    jobs::spawn_dead_engine_sweep(app.clone(), config.dead_sweep_period);

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        tracing::info!("CORS enabled from CORS_ALLOWED_ORIGINS");
        router = router.layer(cors);
    }

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(cors.allow_origin(origins))
}
