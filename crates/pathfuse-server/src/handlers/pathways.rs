//! Merged graph rendering and the annotation tree.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use pathfuse_analysis::TreeNode;
use pathfuse_core::{ExportFormat, Payload};

use crate::error::ApiError;
use crate::schema::query::QueryParams;
use crate::state::AppState;

const PATHWAY_OPTIONS: [&str; 2] = ["format", "collapse"];

/// Renders the merged graph in the requested format.
///
/// `GET /api/pathway/`
pub async fn get_pathway(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = QueryParams::new(pairs);
    let selection = params.selection(&state.registry)?;
    let format: ExportFormat = params.get("format").unwrap_or("json").parse()?;
    let collapse = params.flag("collapse")?.unwrap_or(false);
    let filter = params.filter(&PATHWAY_OPTIONS);

    let payload = state
        .with_service(move |service| {
            service.export_pathways(&selection, &filter, collapse, format)
        })
        .await?;
    Ok(payload_response(payload))
}

/// Annotation keys and values of the merged graph.
///
/// `GET /api/tree/`
pub async fn get_tree(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<TreeNode>>, ApiError> {
    let params = QueryParams::new(pairs);
    let selection = params.selection(&state.registry)?;
    let filter = params.filter(&[]);

    let tree = state
        .with_service(move |service| service.annotation_tree(&selection, &filter))
        .await?;
    Ok(Json(tree))
}

fn payload_response(payload: Payload) -> Response {
    match payload {
        Payload::Json(value) => Json(value).into_response(),
        Payload::Text { media_type, body } => {
            ([(header::CONTENT_TYPE, media_type)], body).into_response()
        }
        Payload::Attachment {
            media_type,
            file_name,
            body,
        } => (
            [
                (header::CONTENT_TYPE, media_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            body,
        )
            .into_response(),
    }
}
