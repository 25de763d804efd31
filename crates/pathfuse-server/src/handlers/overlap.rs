//! Venn overlap handler.

use axum::extract::{Query, State};
use axum::Json;

use pathfuse_analysis::VennRecord;

use crate::error::ApiError;
use crate::schema::query::QueryParams;
use crate::state::AppState;

/// Overlap records between two or more pathways.
///
/// `GET /api/pathway/overlap` (also served at `/pathway/overlap`)
pub async fn get_overlap(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<VennRecord>>, ApiError> {
    let params = QueryParams::new(pairs);
    let selection = params.selection(&state.registry)?;
    if selection.len() < 2 {
        return Err(ApiError::BadRequest(
            "at least two pathways are needed to compute an overlap".to_string(),
        ));
    }
    let detail = params.flag("detail")?;
    let order = params.number("order")?.unwrap_or(2);
    if order < 2 {
        return Err(ApiError::BadRequest(format!(
            "order must be at least 2, got {order}"
        )));
    }

    let records = state
        .with_service(move |service| service.overlap(&selection, detail, order))
        .await?;
    Ok(Json(records))
}
