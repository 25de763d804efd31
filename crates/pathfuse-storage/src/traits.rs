//! The [`PathwayRepository`] trait defining the storage contract for
//! pathway blobs.
//!
//! Both backends (InMemoryStore, SqliteStore) implement this trait with
//! identical semantics, so callers can swap them without changing logic.
//! Reads never modify rows; the analysis layer treats stored blobs as
//! read-only input.

use crate::error::StorageError;
use crate::types::{NewPathway, Pathway};

/// The storage contract for pathways.
///
/// The trait is synchronous and object-safe: the server and the resource
/// managers work against `&dyn PathwayRepository`.
pub trait PathwayRepository {
    // -------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------

    /// Returns the pathway stored under `(pathway_id, resource_name)`.
    fn get_pathway_by_id(
        &self,
        pathway_id: &str,
        resource_name: &str,
    ) -> Result<Option<Pathway>, StorageError>;

    /// Returns the first pathway of `resource_name` named exactly `name`.
    fn get_pathway_by_name(
        &self,
        name: &str,
        resource_name: &str,
    ) -> Result<Option<Pathway>, StorageError>;

    /// All pathways in insertion order.
    fn get_all_pathways(&self) -> Result<Vec<Pathway>, StorageError>;

    fn get_pathways_from_resource(&self, resource_name: &str) -> Result<Vec<Pathway>, StorageError>;

    /// Pathways whose name contains `query` (ASCII case-insensitive), at
    /// most `limit` of them.
    fn query_pathway_by_name(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Pathway>, StorageError>;

    /// Like [`query_pathway_by_name`](Self::query_pathway_by_name),
    /// restricted to one resource.
    fn query_pathway_by_name_and_resource(
        &self,
        query: &str,
        resource_name: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Pathway>, StorageError>;

    // -------------------------------------------------------------------
    // Counts
    // -------------------------------------------------------------------

    fn count_pathways(&self) -> Result<usize, StorageError>;

    /// `(resource_name, count)` pairs sorted by resource name.
    fn count_pathways_by_resource(&self) -> Result<Vec<(String, usize)>, StorageError>;

    // -------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------

    /// Inserts a pathway. Fails with [`StorageError::DuplicatePathway`] if
    /// the `(pathway_id, resource_name)` pair is taken.
    fn create_pathway(&mut self, pathway: NewPathway) -> Result<Pathway, StorageError>;

    /// Returns the stored pathway for the pair, inserting `pathway` first if
    /// there is none. An existing row is never overwritten.
    fn get_or_create_pathway(&mut self, pathway: NewPathway) -> Result<Pathway, StorageError> {
        if let Some(existing) =
            self.get_pathway_by_id(&pathway.pathway_id, &pathway.resource_name)?
        {
            return Ok(existing);
        }
        self.create_pathway(pathway)
    }

    /// Deletes one pathway, returning whether it existed.
    fn delete_pathway(&mut self, pathway_id: &str, resource_name: &str)
        -> Result<bool, StorageError>;

    /// Deletes every pathway of a resource, returning how many were removed.
    fn delete_pathways_from_resource(&mut self, resource_name: &str) -> Result<usize, StorageError>;

    /// Deletes everything, returning how many pathways were removed.
    fn delete_all_pathways(&mut self) -> Result<usize, StorageError>;
}
