//! Application startup and lifecycle management.
//!
//! Collaborators are constructed once in [`Application::build`] and shared
//! with every request through [`AppState`].

use crate::config::StudyConfig;
use crate::handlers::{
    fallback::{method_not_allowed, not_found},
    health_check,
    metrics::metrics_endpoint,
    scripture::{get_chapter, get_verse, search},
    study::{analyze, ask, study_guide},
};
use crate::services::commentary::CommentaryGenerator;
use crate::services::metrics::{init_metrics, metrics_middleware};
use crate::services::providers::mock::MockTextProvider;
use crate::services::providers::openai::OpenAiTextProvider;
use crate::services::providers::TextProvider;
use crate::services::scripture::{BibleApiResolver, ScriptureResolver};
use crate::services::StudyOrchestrator;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<StudyOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<StudyOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/verse", get(get_verse).fallback(method_not_allowed))
        .route("/chapter", get(get_chapter).fallback(method_not_allowed))
        .route("/search", get(search).fallback(method_not_allowed))
        .route("/analyze", post(analyze).fallback(method_not_allowed))
        .route("/ask", post(ask).fallback(method_not_allowed))
        .route("/study", get(study_guide).fallback(method_not_allowed))
        .route("/health", get(health_check).fallback(method_not_allowed))
}

/// Routes are served both at the root and under `/api`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .route("/metrics", get(metrics_endpoint).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Pick the language-model backend from configuration.
fn text_provider(config: &StudyConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    if !config.openai.enabled {
        tracing::info!("OpenAI provider disabled, using mock text provider");
        return Ok(Arc::new(MockTextProvider::new(true)));
    }

    let provider = OpenAiTextProvider::new(config.openai.clone(), config.generation.timeout())
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

    tracing::info!(
        model = %config.openai.model,
        base_url = %config.openai.base_url,
        "Initialized OpenAI text provider"
    );
    Ok(Arc::new(provider))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: StudyConfig) -> Result<Self, AppError> {
        init_metrics();

        let resolver: Arc<dyn ScriptureResolver> = Arc::new(
            BibleApiResolver::new(&config.scripture)
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );
        tracing::info!(
            base_url = %config.scripture.base_url,
            timeout_secs = config.scripture.timeout_secs,
            "Initialized scripture resolver"
        );

        let provider = text_provider(&config)?;
        // Liveness stays fixed; a misconfigured provider only surfaces per request.
        if let Err(e) = provider.health_check().await {
            tracing::warn!(provider = provider.name(), error = %e, "Text provider not ready");
        }

        let generator = CommentaryGenerator::new(provider, config.generation.timeout());
        let orchestrator = Arc::new(StudyOrchestrator::new(resolver, generator));

        // Port 0 = random port for testing
        let address = format!("{}:{}", config.common.host, config.common.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Bible study service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(orchestrator),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
