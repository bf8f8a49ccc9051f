use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::config::{AppConfig, CorsConfig, StoreProvider};
use crate::pulse::{
    self,
    persistence::{
        MoodStore,
        providers::{memory::MemoryStore, postgres::PostgresStore},
    },
    service::PulseService,
};

/// Request bodies are tiny JSON objects.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Connect the configured store.
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn MoodStore>> {
    let store: Arc<dyn MoodStore> = match config.persistence.provider {
        StoreProvider::Memory => {
            info!(name: "persistence.ready", provider = "memory", "Using in-memory store");
            Arc::new(MemoryStore::new())
        }
        StoreProvider::Postgres => {
            let store = PostgresStore::new(
                &config.persistence.database_url,
                config.persistence.max_connections,
            )
            .await?;
            info!(name: "persistence.ready", provider = "postgres", "Postgres store ready, migrations applied");
            Arc::new(store)
        }
    };
    Ok(store)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let store = connect_store(&config).await?;
    let state = AppState::new(Arc::new(PulseService::new(store)), Arc::clone(&config));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(name: "server.stopped", "Server shut down");
    Ok(())
}

/// Full application router with middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout_duration = state.config.resilience.request_timeout();

    Router::new()
        .route("/health", get(health))
        .nest("/api", pulse::api::router())
        .merge(pulse::api::legacy_router())
        .with_state(Arc::clone(&state.pulse))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn_with_state(
            timeout_duration,
            request_timeout,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            pulse::security::rate_limit::rate_limit_middleware,
        ))
        .layer(cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
}

async fn request_timeout(
    State(duration): State<Duration>,
    req: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(duration, next.run(req)).await {
        Ok(res) => res,
        Err(_) => (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
            .into_response(),
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::persistence::providers::memory::MemoryStore;
    use axum::body::{Body, to_bytes};
    use axum::http::header;
    use tower::ServiceExt;

    fn app(allowed_origins: Vec<String>) -> Router {
        let mut config = AppConfig::defaults().unwrap();
        config.resilience.rate_limit_enabled = false;
        config.cors.allowed_origins = allowed_origins;
        let service = Arc::new(PulseService::new(Arc::new(MemoryStore::new())));
        build_router(AppState::new(service, Arc::new(config)))
    }

    fn preflight(origin: &str) -> Request {
        axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/moods")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_preflight_allows_any_origin_by_default() {
        let response = app(Vec::new())
            .oneshot(preflight("http://team.example"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_preflight_respects_origin_list() {
        let app = app(vec!["http://coach.example".to_string()]);

        let allowed = app
            .clone()
            .oneshot(preflight("http://coach.example"))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://coach.example"
        );

        let denied = app.oneshot(preflight("http://other.example")).await.unwrap();
        assert!(
            denied
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_json_error() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "done"
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                Duration::from_millis(10),
                request_timeout,
            ));

        let response = app
            .oneshot(axum::http::Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "Request timed out" }));
    }
}
