pub mod customers;
pub mod drivers;
pub mod ws;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(drivers::router())
        .merge(customers::router());

    Router::new()
        .nest(API_PREFIX, api)
        .route("/", get(index))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Collects missing required fields so one response can name all of them.
#[derive(Default)]
pub(crate) struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub(crate) fn take(&mut self, field: &'static str, value: Option<String>) -> String {
        match value.filter(|value| !value.trim().is_empty()) {
            Some(value) => value,
            None => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    pub(crate) fn mark_missing(&mut self, field: &'static str) {
        self.missing.push(field);
    }

    pub(crate) fn finish(self) -> Result<(), AppError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "missing required fields: {}",
                self.missing.join(", ")
            )))
        }
    }
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Recovery dispatch API",
        "version": "v1",
        "endpoints": {
            "drivers": format!("{API_PREFIX}/drivers"),
            "customers": format!("{API_PREFIX}/customers"),
            "health": "/health",
            "metrics": "/metrics",
            "assignments": "/ws"
        }
    }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    drivers: usize,
    customers: usize,
    timestamp: DateTime<Utc>,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        drivers: state.drivers.len(),
        customers: state.customers.len(),
        timestamp: Utc::now(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics.set_record_count("driver", state.drivers.len());
    state.metrics.set_record_count("customer", state.customers.len());

    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => AppError::Internal(err).into_response(),
    }
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("route {} not found", uri.path()))
}
