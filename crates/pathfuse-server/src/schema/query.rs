//! Query-string parsing shared by every pathway endpoint.
//!
//! Endpoints receive the raw `key=value` pairs (repeated keys allowed) and
//! pick out the selection, their own options and the annotation filters.
//! All parsing happens before the service lock is taken.

use std::str::FromStr;

use pathfuse_analysis::{AnnotationFilter, PathwaySelection};
use pathfuse_core::NodeSignature;
use pathfuse_storage::ManagerRegistry;

use crate::error::ApiError;

const PATHWAY_KEYS: [&str; 2] = ["pathways[]", "pathways"];
const RESOURCE_KEYS: [&str; 2] = ["resources[]", "resources"];

/// Raw query pairs in request order.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        QueryParams { pairs }
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn required(&self, key: &str) -> Result<&str, ApiError> {
        self.get(key).ok_or_else(|| ApiError::missing(key))
    }

    fn values(&self, keys: &[&str]) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The `(pathway_id, resource)` selection. Both lists must be present
    /// and of equal length, and every resource must be registered.
    pub fn selection(&self, registry: &ManagerRegistry) -> Result<PathwaySelection, ApiError> {
        let pathways = self.values(&PATHWAY_KEYS);
        if pathways.is_empty() {
            return Err(ApiError::missing(PATHWAY_KEYS[0]));
        }
        let resources = self.values(&RESOURCE_KEYS);
        if resources.is_empty() {
            return Err(ApiError::missing(RESOURCE_KEYS[0]));
        }
        if pathways.len() != resources.len() {
            return Err(ApiError::BadRequest(format!(
                "got {} pathways[] but {} resources[]",
                pathways.len(),
                resources.len()
            )));
        }
        for resource in &resources {
            registry.require(resource)?;
        }
        Ok(PathwaySelection::from_pairs(pathways.into_iter().zip(resources)))
    }

    /// Every pair whose key is neither a selection key nor in `reserved`.
    pub fn filter(&self, reserved: &[&str]) -> AnnotationFilter {
        let mut filter = AnnotationFilter::new();
        for (key, value) in &self.pairs {
            let key = key.as_str();
            if PATHWAY_KEYS.contains(&key)
                || RESOURCE_KEYS.contains(&key)
                || reserved.contains(&key)
            {
                continue;
            }
            filter
                .entry(key.to_string())
                .or_default()
                .insert(value.clone());
        }
        filter
    }

    /// A boolean flag; absent means `None`.
    pub fn flag(&self, key: &str) -> Result<Option<bool>, ApiError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" | "" => Ok(Some(false)),
            _ => Err(ApiError::BadRequest(format!(
                "{key} must be a boolean, got '{value}'"
            ))),
        }
    }

    /// A non-negative integer; absent means `None`.
    pub fn number(&self, key: &str) -> Result<Option<usize>, ApiError> {
        self.get(key)
            .map(|value| {
                value.trim().parse::<usize>().map_err(|_| {
                    ApiError::BadRequest(format!("{key} must be a non-negative integer, got '{value}'"))
                })
            })
            .transpose()
    }

    pub fn signature(&self, key: &str) -> Result<NodeSignature, ApiError> {
        let value = self.required(key)?;
        Ok(NodeSignature::from_str(value.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfuse_storage::DEFAULT_RESOURCES;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn registry() -> ManagerRegistry {
        ManagerRegistry::from_resources(DEFAULT_RESOURCES)
    }

    #[test]
    fn selection_pairs_up_in_order() {
        let query = params(&[
            ("pathways[]", "hsa04012"),
            ("resources[]", "kegg"),
            ("pathways[]", "R-HSA-177929"),
            ("resources", "reactome"),
        ]);
        let selection = query.selection(&registry()).unwrap();
        let pairs: Vec<_> = selection.iter().collect();
        assert_eq!(
            pairs,
            vec![("hsa04012", "kegg"), ("R-HSA-177929", "reactome")]
        );
    }

    #[test]
    fn selection_errors_name_the_argument() {
        let err = params(&[("resources[]", "kegg")])
            .selection(&registry())
            .unwrap_err();
        assert!(err.to_string().contains("pathways[]"));

        let err = params(&[("pathways[]", "hsa1")])
            .selection(&registry())
            .unwrap_err();
        assert!(err.to_string().contains("resources[]"));

        let err = params(&[("pathways[]", "a"), ("pathways[]", "b"), ("resources[]", "kegg")])
            .selection(&registry())
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = params(&[("pathways[]", "a"), ("resources[]", "biocarta")])
            .selection(&registry())
            .unwrap_err();
        assert!(err.to_string().contains("biocarta"));
    }

    #[test]
    fn filters_skip_reserved_keys() {
        let query = params(&[
            ("pathways[]", "a"),
            ("resources[]", "kegg"),
            ("format", "bel"),
            ("Database", "kegg"),
            ("Database", "reactome"),
        ]);
        let filter = query.filter(&["format"]);
        assert_eq!(filter.len(), 1);
        assert_eq!(filter["Database"].len(), 2);
    }

    #[test]
    fn flags_and_numbers() {
        let query = params(&[("undirected", "True"), ("cutoff", "3"), ("bad", "maybe")]);
        assert_eq!(query.flag("undirected").unwrap(), Some(true));
        assert_eq!(query.flag("random").unwrap(), None);
        assert!(query.flag("bad").is_err());
        assert_eq!(query.number("cutoff").unwrap(), Some(3));
        assert_eq!(query.number("missing").unwrap(), None);
        assert!(query.number("bad").is_err());
    }
}
