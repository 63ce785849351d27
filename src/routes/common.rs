//! Common routes: welcome, health, readiness, liveness, version, OpenAPI document.

use crate::openapi::ApiDoc;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use utoipa::OpenApi;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
struct ReadyChecks {
    database: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    checks: ReadyChecks,
}

async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": format!("Welcome to {}!", state.app_name),
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/openapi.json"
    }))
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy",
        service: "api",
    })
}

async fn live() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "alive" }))
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    let database = match &state.pool {
        Some(pool) => match sqlx::query("SELECT 1").fetch_optional(pool).await {
            Ok(_) => "ok",
            Err(e) => {
                tracing::error!(error = %e, "database readiness check failed");
                "error"
            }
        },
        None => "memory",
    };
    let (code, status) = if database == "error" {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    } else {
        (StatusCode::OK, "ready")
    };
    (
        code,
        Json(ReadyBody {
            status,
            checks: ReadyChecks { database },
        }),
    )
}

async fn version(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "app": state.app_name.as_ref(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /, /health, /health/ready, /health/live, /version, /openapi.json.
pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .route("/health/live", get(live))
        .route("/version", get(version))
        .route("/openapi.json", get(openapi))
        .with_state(state)
}
