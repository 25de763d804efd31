//! In-memory implementation of [`PathwayRepository`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and for short-lived
//! tooling. Rows live in a `BTreeMap` keyed by row id, which gives the same
//! insertion ordering as the SQLite backend's `ORDER BY id`.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::error::StorageError;
use crate::traits::PathwayRepository;
use crate::types::{NewPathway, Pathway};

/// In-memory implementation of [`PathwayRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    pathways: BTreeMap<i64, Pathway>,
    next_id: i64,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        InMemoryStore {
            pathways: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn find<P>(&self, predicate: P, limit: Option<usize>) -> Vec<Pathway>
    where
        P: Fn(&Pathway) -> bool,
    {
        self.pathways
            .values()
            .filter(|pathway| predicate(pathway))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn name_contains(name: &str, query: &str) -> bool {
    name.to_ascii_lowercase()
        .contains(&query.to_ascii_lowercase())
}

impl PathwayRepository for InMemoryStore {
    fn get_pathway_by_id(
        &self,
        pathway_id: &str,
        resource_name: &str,
    ) -> Result<Option<Pathway>, StorageError> {
        Ok(self
            .pathways
            .values()
            .find(|p| p.pathway_id == pathway_id && p.resource_name == resource_name)
            .cloned())
    }

    fn get_pathway_by_name(
        &self,
        name: &str,
        resource_name: &str,
    ) -> Result<Option<Pathway>, StorageError> {
        Ok(self
            .pathways
            .values()
            .find(|p| p.name == name && p.resource_name == resource_name)
            .cloned())
    }

    fn get_all_pathways(&self) -> Result<Vec<Pathway>, StorageError> {
        Ok(self.pathways.values().cloned().collect())
    }

    fn get_pathways_from_resource(&self, resource_name: &str) -> Result<Vec<Pathway>, StorageError> {
        Ok(self.find(|p| p.resource_name == resource_name, None))
    }

    fn query_pathway_by_name(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Pathway>, StorageError> {
        Ok(self.find(|p| name_contains(&p.name, query), limit))
    }

    fn query_pathway_by_name_and_resource(
        &self,
        query: &str,
        resource_name: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Pathway>, StorageError> {
        Ok(self.find(
            |p| p.resource_name == resource_name && name_contains(&p.name, query),
            limit,
        ))
    }

    fn count_pathways(&self) -> Result<usize, StorageError> {
        Ok(self.pathways.len())
    }

    fn count_pathways_by_resource(&self) -> Result<Vec<(String, usize)>, StorageError> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for pathway in self.pathways.values() {
            *counts.entry(pathway.resource_name.clone()).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    fn create_pathway(&mut self, pathway: NewPathway) -> Result<Pathway, StorageError> {
        if self
            .get_pathway_by_id(&pathway.pathway_id, &pathway.resource_name)?
            .is_some()
        {
            return Err(StorageError::DuplicatePathway {
                pathway_id: pathway.pathway_id,
                resource: pathway.resource_name,
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        let row = pathway.into_pathway(id, Utc::now());
        self.pathways.insert(id, row.clone());
        Ok(row)
    }

    fn delete_pathway(
        &mut self,
        pathway_id: &str,
        resource_name: &str,
    ) -> Result<bool, StorageError> {
        let before = self.pathways.len();
        self.pathways
            .retain(|_, p| !(p.pathway_id == pathway_id && p.resource_name == resource_name));
        Ok(self.pathways.len() != before)
    }

    fn delete_pathways_from_resource(&mut self, resource_name: &str) -> Result<usize, StorageError> {
        let before = self.pathways.len();
        self.pathways.retain(|_, p| p.resource_name != resource_name);
        Ok(before - self.pathways.len())
    }

    fn delete_all_pathways(&mut self) -> Result<usize, StorageError> {
        let removed = self.pathways.len();
        self.pathways.clear();
        Ok(removed)
    }
}
