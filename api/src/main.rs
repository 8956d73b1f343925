use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use clarh_core::clock::ReferenceClock;

mod classifier;
mod completion;
mod config;
mod error;
mod extract;
mod middleware;
mod routes;
mod state;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clarh API",
        version = "0.1.0",
        description = "Turns a line of free-form text into a normalized Task, Event or Note record."
    ),
    paths(routes::health::health_check, routes::classify::classify),
    components(schemas(
        HealthResponse,
        routes::classify::ClassifyRequest,
        clarh_core::record::ClassifiedRecord,
        clarh_core::record::RecordType,
        clarh_core::error::ErrorBody,
    ))
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clarh_api=debug,clarh_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = match config::Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let provider = match completion::OpenAiResponses::new(
        &config.openai_base_url,
        config.api_key.clone(),
        config.model.clone(),
        config.completion_timeout,
    ) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!(error = %e, "failed to build completion client");
            return ExitCode::FAILURE;
        }
    };

    let classifier = classifier::Classifier::new(
        Arc::new(provider),
        ReferenceClock::system(config.timezone),
        config.policy,
        config.temperature,
    );
    let app_state = state::AppState {
        classifier: Arc::new(classifier),
    };

    let cors_layer = middleware::cors::build_cors_layer(&config.cors_origins);

    let app = routes::build_router(app_state, cors_layer)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        %addr,
        model = %config.model,
        timezone = config.timezone.name(),
        profile = config.profile.as_str(),
        "Clarh API listening"
    );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
