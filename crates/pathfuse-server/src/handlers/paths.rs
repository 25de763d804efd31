//! Path and centrality handlers.

use axum::extract::{Query, State};
use axum::Json;

use pathfuse_core::NodeSignature;

use crate::error::ApiError;
use crate::schema::paths::{PathsMethod, PathsRequest, PathsResponse, DEFAULT_CUTOFF};
use crate::schema::query::QueryParams;
use crate::state::AppState;

const PATH_OPTIONS: [&str; 6] = [
    "source",
    "target",
    "cutoff",
    "undirected",
    "paths_method",
    "random",
];

/// Shortest or all simple paths between two nodes.
///
/// `GET /api/pathway/paths`
pub async fn get_paths(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PathsResponse>, ApiError> {
    let params = QueryParams::new(pairs);
    let selection = params.selection(&state.registry)?;
    let request = PathsRequest {
        source: params.signature("source")?,
        target: params.signature("target")?,
        cutoff: params.number("cutoff")?.unwrap_or(DEFAULT_CUTOFF),
        undirected: params.flag("undirected")?.unwrap_or(false),
        method: PathsMethod::parse(params.get("paths_method"))?,
        random: params.flag("random")?.unwrap_or(false),
    };
    let filter = params.filter(&PATH_OPTIONS);

    let paths = state
        .with_service(move |service| service.find_paths(&selection, &filter, &request))
        .await?;
    Ok(Json(paths))
}

/// One random walk through the merged graph.
///
/// `GET /api/pathway/paths/random`
pub async fn get_random_path(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PathsResponse>, ApiError> {
    let params = QueryParams::new(pairs);
    let selection = params.selection(&state.registry)?;
    let filter = params.filter(&[]);

    let path = state
        .with_service(move |service| service.random_path(&selection, &filter))
        .await?;
    Ok(Json(path))
}

/// The `node_number` most central nodes.
///
/// `GET /api/pathway/centrality`
pub async fn get_centrality(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<NodeSignature>>, ApiError> {
    let params = QueryParams::new(pairs);
    let selection = params.selection(&state.registry)?;
    let k = params
        .number("node_number")?
        .ok_or_else(|| ApiError::missing("node_number"))?;
    let filter = params.filter(&["node_number"]);

    let nodes = state
        .with_service(move |service| service.central_nodes(&selection, &filter, k))
        .await?;
    Ok(Json(nodes))
}
