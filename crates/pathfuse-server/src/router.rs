//! Router assembly for the pathfuse HTTP API.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// CORS is permissive. TraceLayer logs every request through tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Merged graph views
        .route("/api/pathway/", get(handlers::pathways::get_pathway))
        .route("/api/tree/", get(handlers::pathways::get_tree))
        .route("/api/pathway/paths", get(handlers::paths::get_paths))
        .route(
            "/api/pathway/paths/random",
            get(handlers::paths::get_random_path),
        )
        .route(
            "/api/pathway/centrality",
            get(handlers::paths::get_centrality),
        )
        // Overlap
        .route("/api/pathway/overlap", get(handlers::overlap::get_overlap))
        .route("/pathway/overlap", get(handlers::overlap::get_overlap))
        // Catalog
        .route(
            "/api/autocompletion/pathway_name",
            get(handlers::catalog::autocomplete_pathway_name),
        )
        .route("/api/resources", get(handlers::catalog::list_resources))
        .route(
            "/admin/delete/pathways",
            get(handlers::catalog::delete_pathways),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
