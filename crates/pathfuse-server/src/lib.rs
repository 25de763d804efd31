//! HTTP/JSON API for merging and exploring stored pathway graphs.
//!
//! Every request names a selection of `(pathway_id, resource)` pairs. The
//! server validates the request, merges the selected graphs afresh and
//! returns a derived view: the rendered graph, its annotation tree, paths,
//! centrality ranking or Venn overlap records. Nothing derived is cached.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
