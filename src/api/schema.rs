use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::{SchemaParams, SchemaResponse};
use crate::state::AppState;

/// GET /api/schema?refresh=true - describe the graph's labels and relationships.
pub async fn get_schema(
    State(state): State<AppState>,
    Query(params): Query<SchemaParams>,
) -> Result<Json<SchemaResponse>, (StatusCode, String)> {
    let schema = state.graph.schema(params.refresh).await.map_err(|e| {
        (
            StatusCode::BAD_GATEWAY,
            format!("Failed to read graph schema: {e}"),
        )
    })?;

    Ok(Json(SchemaResponse { schema }))
}
