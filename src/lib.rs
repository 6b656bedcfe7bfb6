//! # serietrack
//!
//! REST API for tracking TV series watch progress. Users register and log in
//! with email/password, receive a JWT bearer token, and manage their own
//! series records (title, rating, seasons, episode progress, watch status).
//! Records are strictly scoped per user.
//!
//! ## Quick start
//!
//! ```no_run
//! use serietrack::{Application, Config, config::Args};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.ok();
//!     })
//!     .await
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`api`]: HTTP handlers and wire models (validation, `{message, ...}` envelopes)
//! - [`db`]: repositories and database models (sqlx/PostgreSQL)
//! - [`auth`]: password hashing, JWT sessions, the `CurrentUser` extractor
//! - [`config`]: YAML + environment configuration
//! - [`telemetry`]: tracing setup

use axum::{
    Json, Router,
    routing::{delete, get, patch, post, put},
};
use bon::Builder;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi as _;
use utoipa_scalar::{Scalar, Servable as _};

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

pub use config::Config;
pub use types::{SeriesId, UserId};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the serietrack database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

async fn root() -> &'static str {
    "serietrack API online. See /health for liveness, /docs for documentation, and the routes under /api."
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

/// Build the application router.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/register", post(api::handlers::auth::register))
        .route("/api/login", post(api::handlers::auth::login))
        .route("/api/protected", get(api::handlers::auth::protected));

    let series_routes = Router::new()
        .route("/api/series", post(api::handlers::series::create_series))
        .route("/api/series", get(api::handlers::series::list_series))
        .route("/api/series/{id}", get(api::handlers::series::get_series))
        .route("/api/series/{id}", put(api::handlers::series::update_series))
        .route("/api/series/{id}", patch(api::handlers::series::patch_series))
        .route("/api/series/{id}", delete(api::handlers::series::delete_series));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(auth_routes)
        .merge(series_routes)
        .with_state(state)
        .merge(Scalar::with_url("/docs", openapi::ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects the pool, runs migrations and
///    builds the router
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles requests
/// 3. **Shutdown**: on the shutdown signal, in-flight requests drain and the
///    pool is closed
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("database_url is required"))?;

        let pool = PgPool::connect(database_url).await?;
        migrator().run(&pool).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("serietrack listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use sqlx::postgres::PgPoolOptions;

    // Liveness and docs routes never touch the database, so a lazy pool is enough
    fn test_server() -> TestServer {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let config = Config {
            secret_key: Some("test-secret-key".to_string()),
            ..Default::default()
        };
        let state = AppState::builder().db(pool).config(config).build();
        TestServer::new(build_router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let server = test_server();

        let response = server.get("/health").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_root_is_public() {
        let server = test_server();

        let response = server.get("/").await;
        response.assert_status_ok();
        assert!(response.text().contains("serietrack"));
    }

    #[tokio::test]
    async fn test_openapi_json_served() {
        let server = test_server();

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert!(body["paths"].get("/api/series").is_some());
    }
}
