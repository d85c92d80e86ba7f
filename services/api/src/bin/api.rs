//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{InMemorySessionStore, OpenAiQuizGenerator, PlainTextExtractor},
    config::Config,
    error::ApiError,
    web::{
        create_session_handler, generate_quiz_handler, get_session_handler,
        list_subjects_handler, record_answer_handler, rest::ApiDoc, state::AppState,
        submit_answers_handler, upload_document_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let mut openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    if let Some(api_base) = &config.openai_api_base {
        openai_config = openai_config.with_api_base(api_base);
    }
    let openai_client = Client::with_config(openai_config);

    let generator = Arc::new(OpenAiQuizGenerator::new(
        openai_client,
        config.generation_model.clone(),
    ));
    let extractor = Arc::new(PlainTextExtractor::new());
    let store = Arc::new(InMemorySessionStore::new());

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        generator,
        extractor,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/sessions", post(create_session_handler))
        .route("/sessions/{session_id}", get(get_session_handler))
        .route(
            "/sessions/{session_id}/document",
            post(upload_document_handler),
        )
        .route("/sessions/{session_id}/quiz", post(generate_quiz_handler))
        .route(
            "/sessions/{session_id}/answers/{index}",
            put(record_answer_handler),
        )
        .route(
            "/sessions/{session_id}/submission",
            post(submit_answers_handler),
        )
        .route("/subjects", get(list_subjects_handler))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
