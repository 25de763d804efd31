//! Per-resource data managers.
//!
//! Each source database (resource) is served by a [`PathwayDataManager`].
//! The [`ManagerRegistry`] is a fixed table from resource name to manager,
//! built once at start-up from configuration. Request validation consults
//! it to reject unknown resources before any repository work happens.

use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::traits::PathwayRepository;
use crate::types::{NewPathway, Pathway};

/// Resources registered when no configuration overrides them.
pub const DEFAULT_RESOURCES: [&str; 3] = ["kegg", "reactome", "wikipathways"];

/// Capability object for one resource.
pub trait PathwayDataManager: Send + Sync {
    /// The resource this manager owns.
    fn resource_name(&self) -> &str;

    /// Looks up a pathway of this resource.
    fn lookup(
        &self,
        repo: &dyn PathwayRepository,
        pathway_id: &str,
    ) -> Result<Option<Pathway>, StorageError> {
        repo.get_pathway_by_id(pathway_id, self.resource_name())
    }

    /// Imports a pathway, keeping an existing row with the same identifier.
    fn import(
        &self,
        repo: &mut dyn PathwayRepository,
        pathway: NewPathway,
    ) -> Result<Pathway, StorageError> {
        if pathway.resource_name != self.resource_name() {
            return Err(StorageError::ResourceMismatch {
                expected: self.resource_name().to_string(),
                found: pathway.resource_name,
            });
        }
        repo.get_or_create_pathway(pathway)
    }

    /// Number of stored pathways of this resource.
    fn count(&self, repo: &dyn PathwayRepository) -> Result<usize, StorageError> {
        Ok(repo.get_pathways_from_resource(self.resource_name())?.len())
    }
}

/// The default manager: stores pathways of one named resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceManager {
    resource: String,
}

impl ResourceManager {
    pub fn new(resource: impl Into<String>) -> Self {
        ResourceManager {
            resource: resource.into(),
        }
    }
}

impl PathwayDataManager for ResourceManager {
    fn resource_name(&self) -> &str {
        &self.resource
    }
}

/// Resource name to manager table.
#[derive(Default)]
pub struct ManagerRegistry {
    managers: BTreeMap<String, Box<dyn PathwayDataManager>>,
}

impl ManagerRegistry {
    pub fn new() -> Self {
        ManagerRegistry::default()
    }

    /// A registry with one [`ResourceManager`] per name. Blank names are
    /// skipped and surrounding whitespace is trimmed.
    pub fn from_resources<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = ManagerRegistry::new();
        for resource in resources {
            let resource = resource.as_ref().trim();
            if !resource.is_empty() {
                registry.register(Box::new(ResourceManager::new(resource)));
            }
        }
        registry
    }

    /// Adds (or replaces) the manager for its resource.
    pub fn register(&mut self, manager: Box<dyn PathwayDataManager>) {
        self.managers
            .insert(manager.resource_name().to_string(), manager);
    }

    pub fn get(&self, resource: &str) -> Option<&dyn PathwayDataManager> {
        self.managers.get(resource).map(|m| m.as_ref())
    }

    /// Like [`get`](Self::get), failing with [`StorageError::UnknownResource`].
    pub fn require(&self, resource: &str) -> Result<&dyn PathwayDataManager, StorageError> {
        self.get(resource)
            .ok_or_else(|| StorageError::UnknownResource {
                resource: resource.to_string(),
            })
    }

    pub fn contains(&self, resource: &str) -> bool {
        self.managers.contains_key(resource)
    }

    /// Registered resource names in sorted order.
    pub fn resources(&self) -> impl Iterator<Item = &str> + '_ {
        self.managers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

impl std::fmt::Debug for ManagerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.managers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::types::fixtures::new_pathway;

    #[test]
    fn from_resources_trims_and_skips_blanks() {
        let registry = ManagerRegistry::from_resources([" kegg", "reactome ", "", "kegg"]);
        assert_eq!(registry.resources().collect::<Vec<_>>(), vec!["kegg", "reactome"]);
        assert!(registry.contains("kegg"));
        assert!(!registry.contains("wikipathways"));
    }

    #[test]
    fn require_rejects_unknown_resource() {
        let registry = ManagerRegistry::from_resources(DEFAULT_RESOURCES);
        assert_eq!(registry.len(), 3);
        assert!(registry.require("reactome").is_ok());
        let err = registry.require("biocarta").err().unwrap();
        assert!(matches!(err, StorageError::UnknownResource { .. }));
    }

    #[test]
    fn manager_imports_and_counts_its_resource() {
        let registry = ManagerRegistry::from_resources(DEFAULT_RESOURCES);
        let mut repo = InMemoryStore::new();
        let kegg = registry.require("kegg").unwrap();

        kegg.import(&mut repo, new_pathway("hsa04012", "kegg", "ErbB"))
            .unwrap();
        kegg.import(&mut repo, new_pathway("hsa04012", "kegg", "ErbB again"))
            .unwrap();
        assert_eq!(kegg.count(&repo).unwrap(), 1);
        assert!(kegg.lookup(&repo, "hsa04012").unwrap().is_some());
        assert_eq!(registry.require("reactome").unwrap().count(&repo).unwrap(), 0);
    }

    #[test]
    fn manager_refuses_foreign_resource() {
        let manager = ResourceManager::new("kegg");
        let mut repo = InMemoryStore::new();
        let err = manager
            .import(&mut repo, new_pathway("R-HSA-1", "reactome", "x"))
            .unwrap_err();
        assert!(matches!(err, StorageError::ResourceMismatch { .. }));
        assert_eq!(repo.count_pathways().unwrap(), 0);
    }
}
