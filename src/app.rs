use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::config;
use crate::handlers::{self, companies, jobs};
use crate::middleware::authenticate_jwt;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(company_routes())
        .merge(job_routes())
        .with_state(state)
        // Global middleware
        .layer(middleware::from_fn(authenticate_jwt))
        .layer(CorsLayer::permissive());

    if config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(companies::list).post(companies::post))
        .route(
            "/companies/:handle",
            get(companies::get)
                .patch(companies::patch)
                .delete(companies::delete),
        )
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(jobs::list).post(jobs::post))
        .route(
            "/jobs/:id",
            get(jobs::get).patch(jobs::patch).delete(jobs::delete),
        )
}
