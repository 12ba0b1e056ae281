use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use migration::MigratorTrait;
use sea_orm::Database;
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::{self, Config};
use crate::task::TaskState;
use crate::task::api::v1::TaskApiDoc;
use crate::user::UserService;

pub mod api;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Custom error type for building the web application.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// The configured CORS origin is not a valid header value.
    #[error("Invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}

/// Greeting returned by the root endpoint.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let owner = UserService::new(&db)
        .get_user_by_id(config.default_owner_id)
        .await?;
    tracing::info!(
        "New tasks will be owned by '{}' (ID {})",
        owner.username(),
        owner.id()
    );

    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(db),
    };
    let app = create_app(state)?;

    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the full application router: public endpoints, the versioned task
/// API, and the tracing and CORS layers.
pub fn create_app(state: AppState) -> Result<Router, WebError> {
    let origin = HeaderValue::from_str(&state.config.cors_allowed_origin)
        .map_err(|_| WebError::InvalidCorsOrigin(state.config.cors_allowed_origin.clone()))?;

    let task_state = Arc::new(TaskState {
        db: state.db.clone(),
        default_owner_id: state.config.default_owner_id,
    });

    let public_routes = Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .route("/", axum::routing::get(welcome_handler))
        .route("/api-docs/openapi.json", axum::routing::get(openapi_handler));

    let app = Router::new()
        .merge(public_routes)
        .merge(api::create_api_router(task_state))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        );
    Ok(app)
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[tracing::instrument]
pub async fn welcome_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the task tracker API!",
    })
}

/// Serves the OpenAPI document of the task API.
#[tracing::instrument]
pub async fn openapi_handler() -> Response {
    match serde_json::to_value(TaskApiDoc::openapi()) {
        Ok(doc) => Json(doc).into_response(),
        Err(err) => {
            tracing::error!("Failed to serialize OpenAPI document: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
