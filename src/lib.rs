pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod session;

pub const STATIC_HASH: &str = env!("STATIC_HASH");

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Redirect, Response},
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::MaybeUser;
use crate::config::Settings;
use crate::error::error_page;
use crate::session::SessionRegistry;

/// Everything a handler can reach. Cloned per request; the pool and the
/// session registry are shared handles.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub sessions: SessionRegistry,
    pub settings: Settings,
}

impl AppState {
    pub fn new(db: SqlitePool, settings: Settings) -> Self {
        Self {
            db,
            sessions: SessionRegistry::new(),
            settings,
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found_page(MaybeUser(user): MaybeUser) -> Response {
    error_page(
        StatusCode::NOT_FOUND,
        "Page Not Found",
        "The page you are looking for does not exist.",
        user,
    )
}

async fn method_not_allowed_page(MaybeUser(user): MaybeUser) -> Response {
    error_page(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method Not Allowed",
        "That action is not supported on this page.",
        user,
    )
}

/// Build the full Axum application router with a fresh session registry.
///
/// Caller is responsible for running database migrations on `pool` beforehand.
pub fn build_app(pool: SqlitePool, settings: Settings) -> Router {
    router(AppState::new(pool, settings))
}

/// Assemble all route modules, middleware, and the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/games") }))
        .route("/health", get(health))
        .merge(routes::auth::router())
        .merge(routes::games::router())
        .merge(routes::rsvps::router())
        .merge(routes::chat::router())
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=86400"),
                ))
                .service(ServeDir::new("static")),
        )
        .fallback(not_found_page)
        .method_not_allowed_fallback(method_not_allowed_page)
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
