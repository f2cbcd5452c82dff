use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::collections::HashMap;

use crate::api::errors::ApiError;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::schemas::{HealthResponse, RootResponse};

const API_AREAS: [&str; 7] =
    ["auth", "users", "subjects", "exams", "progress", "admin", "tutoring"];

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let api = state.settings().api();
    let prefix = api.api_prefix.trim_end_matches('/');

    let endpoints = API_AREAS
        .iter()
        .map(|area| (area.to_string(), format!("{prefix}/{area}")))
        .collect::<HashMap<_, _>>();

    Json(RootResponse {
        message: api.project_name.clone(),
        version: api.version.clone(),
        endpoints,
    })
}

/// Static liveness body; never touches the database.
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Sistema ICFES API funcionando correctamente".to_string(),
    })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

pub(crate) async fn fallback() -> ApiError {
    ApiError::NotFound("Recurso no encontrado")
}
