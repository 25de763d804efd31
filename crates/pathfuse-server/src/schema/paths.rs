//! Path and centrality request/response types.

use pathfuse_core::NodeSignature;
use serde::Serialize;

use crate::error::ApiError;

/// Depth limit used when `cutoff` is not given.
pub const DEFAULT_CUTOFF: usize = 7;

/// Body sent when the two nodes are not connected.
pub const NO_PATH_MESSAGE: &str = "No paths found between the selected nodes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathsMethod {
    #[default]
    Shortest,
    All,
}

impl PathsMethod {
    pub fn parse(value: Option<&str>) -> Result<Self, ApiError> {
        match value {
            None | Some("shortest") => Ok(PathsMethod::Shortest),
            Some("all") => Ok(PathsMethod::All),
            Some(other) => Err(ApiError::BadRequest(format!(
                "paths_method must be 'shortest' or 'all', got '{other}'"
            ))),
        }
    }
}

/// Parsed `/api/pathway/paths` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsRequest {
    pub source: NodeSignature,
    pub target: NodeSignature,
    pub cutoff: usize,
    pub undirected: bool,
    pub method: PathsMethod,
    /// Substitute a path to a random neighbour when no path exists.
    pub random: bool,
}

/// Either the paths found or a message saying there are none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<Vec<NodeSignature>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PathsResponse {
    pub fn found(paths: Vec<Vec<NodeSignature>>) -> Self {
        PathsResponse {
            paths: Some(paths),
            message: None,
        }
    }

    pub fn no_path() -> Self {
        PathsResponse {
            paths: None,
            message: Some(NO_PATH_MESSAGE.to_string()),
        }
    }
}
