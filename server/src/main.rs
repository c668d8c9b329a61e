mod api;
mod auth;
mod config;
mod db;
mod models;
mod schema;
mod telemetry;
mod views;

use axum::extract::{FromRef, MatchedPath};
use axum::http::Request;
use axum::Router;
use config::ServerConfig;
use std::env;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub config: Arc<ServerConfig>,
}

/// Endpoints polled often enough that their spans are only kept at trace level
const QUIET_PATHS: &[&str] = &["/api/ping"];

pub fn app(state: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api::router(state.config.max_upload_bytes))
        .merge(swagger_ui)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    if QUIET_PATHS.contains(&matched_path) {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pool = Arc::new(db::create_pool(&config.database_url)?);

    if let Some(admin) = &config.admin {
        auth::ensure_admin(&pool, &admin.email, &admin.password)
            .map_err(|e| format!("failed to bootstrap admin account: {}", e))?;
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let addr = listener.local_addr()?;

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec available at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        return match api::openapi().to_pretty_json() {
            Ok(spec) => {
                println!("{}", spec);
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("failed to render OpenAPI spec: {}", e);
                std::process::ExitCode::FAILURE
            }
        };
    }

    let telemetry = telemetry::init_telemetry();

    let code = match ServerConfig::from_env() {
        Ok(config) => match run(config).await {
            Ok(()) => std::process::ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("Server error: {}", e);
                std::process::ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}
