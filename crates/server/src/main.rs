//! Search proxy server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thai_search_config::{load_settings, Settings, SettingsHandle};
use thai_search_executor::MeilisearchClient;
use thai_search_orchestrator::Orchestrator;
use thai_search_server::{create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = std::env::var("SEARCH_PROXY_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => {
            eprintln!("Loaded configuration from files (env: {})", env.as_deref().unwrap_or("default"));
            settings
        }
        Err(e) => {
            eprintln!("Warning: failed to load config: {e}. Using defaults.");
            Settings::default()
        }
    };

    init_tracing(&settings);

    tracing::info!(
        service = %settings.service_name,
        version = %settings.service_version,
        environment = ?settings.environment,
        "starting thai-search-server"
    );

    let backend = Arc::new(MeilisearchClient::new(
        settings.meilisearch_url.clone(),
        settings.meilisearch_api_key.as_deref(),
        Duration::from_millis(settings.meilisearch_timeout_ms),
    )?);

    let primary_tokenizer = thai_search_tokenize::engine::build(&settings.tokenization.primary_engine);
    let fallback_tokenizers = settings
        .tokenization
        .fallback_engines
        .iter()
        .map(|id| thai_search_tokenize::engine::build(id))
        .collect();

    let settings_handle = SettingsHandle::new(settings);
    let orchestrator = Orchestrator::new(settings_handle, primary_tokenizer, fallback_tokenizers, backend);

    let app = create_router(AppState::new(orchestrator));

    let port: u16 = std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => tracing::info!("received SIGTERM, initiating graceful shutdown"),
    }
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("thai_search={},tower_http=info", settings.log_level).into());

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if settings.enable_structured_logging {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }
}
