//! Catalog handlers: autocompletion, resource counts, bulk delete.

use axum::extract::{Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::catalog::{DeleteResponse, ResourceCount, Suggestion};
use crate::schema::query::QueryParams;
use crate::state::AppState;

/// Pathway names containing `q` within `resource`. Missing parameters give
/// an empty list.
///
/// `GET /api/autocompletion/pathway_name`
pub async fn autocomplete_pathway_name(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
    let params = QueryParams::new(pairs);
    let (Some(q), Some(resource)) = (params.get("q"), params.get("resource")) else {
        return Ok(Json(Vec::new()));
    };

    let service = state.service.lock().await;
    Ok(Json(service.suggest_pathway_names(q, resource)?))
}

/// Pathway counts per registered resource.
///
/// `GET /api/resources`
pub async fn list_resources(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResourceCount>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.resource_counts()?))
}

/// Deletes every stored pathway.
///
/// `GET /admin/delete/pathways`
pub async fn delete_pathways(
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.delete_all_pathways()?))
}
