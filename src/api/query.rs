use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::models::AnswerResponse;
use crate::state::AppState;

/// GET / - liveness check
pub async fn health() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

/// GET /query/{query} - answer a question from the knowledge graph.
pub async fn ask(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<AnswerResponse>, (StatusCode, String)> {
    if query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query is required".to_string()));
    }

    let answer = state.pipeline.answer(&query).await.map_err(|e| {
        tracing::error!("Failed to answer query '{query}': {e:#}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to answer query: {e}"),
        )
    })?;

    Ok(Json(AnswerResponse { answer }))
}
