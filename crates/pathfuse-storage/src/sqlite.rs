//! SQLite implementation of [`PathwayRepository`].
//!
//! [`SqliteStore`] persists pathways in a single `pathways` table with WAL
//! mode, atomic transactions on every write, and automatic schema
//! migrations. Timestamps are stored as RFC 3339 text via rusqlite's chrono
//! support; graph blobs as BLOB columns.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StorageError;
use crate::traits::PathwayRepository;
use crate::types::{NewPathway, Pathway};

const COLUMNS: &str = "id, pathway_id, resource_name, name, version, authors, contact, \
                       description, blob_version, created, number_of_nodes, number_of_edges, blob";

/// SQLite-backed implementation of [`PathwayRepository`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn row_to_pathway(row: &Row<'_>) -> rusqlite::Result<Pathway> {
        let blob_version: i64 = row.get(8)?;
        let created: DateTime<Utc> = row.get(9)?;
        let number_of_nodes: i64 = row.get(10)?;
        let number_of_edges: i64 = row.get(11)?;
        Ok(Pathway {
            id: row.get(0)?,
            pathway_id: row.get(1)?,
            resource_name: row.get(2)?,
            name: row.get(3)?,
            version: row.get(4)?,
            authors: row.get(5)?,
            contact: row.get(6)?,
            description: row.get(7)?,
            blob_version: blob_version as u32,
            created,
            number_of_nodes: number_of_nodes as usize,
            number_of_edges: number_of_edges as usize,
            blob: row.get(12)?,
        })
    }

    /// Runs a `SELECT <COLUMNS> FROM pathways <tail>` query.
    fn select<P: rusqlite::Params>(&self, tail: &str, params: P) -> Result<Vec<Pathway>, StorageError> {
        let sql = format!("SELECT {} FROM pathways {}", COLUMNS, tail);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params, Self::row_to_pathway)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn select_one<P: rusqlite::Params>(
        &self,
        tail: &str,
        params: P,
    ) -> Result<Option<Pathway>, StorageError> {
        let sql = format!("SELECT {} FROM pathways {} LIMIT 1", COLUMNS, tail);
        let pathway = self
            .conn
            .query_row(&sql, params, Self::row_to_pathway)
            .optional()?;
        Ok(pathway)
    }
}

/// SQLite reads a negative LIMIT as "no limit".
fn sql_limit(limit: Option<usize>) -> i64 {
    limit.map(|l| l as i64).unwrap_or(-1)
}

impl PathwayRepository for SqliteStore {
    fn get_pathway_by_id(
        &self,
        pathway_id: &str,
        resource_name: &str,
    ) -> Result<Option<Pathway>, StorageError> {
        self.select_one(
            "WHERE pathway_id = ?1 AND resource_name = ?2",
            params![pathway_id, resource_name],
        )
    }

    fn get_pathway_by_name(
        &self,
        name: &str,
        resource_name: &str,
    ) -> Result<Option<Pathway>, StorageError> {
        self.select_one(
            "WHERE name = ?1 AND resource_name = ?2 ORDER BY id",
            params![name, resource_name],
        )
    }

    fn get_all_pathways(&self) -> Result<Vec<Pathway>, StorageError> {
        self.select("ORDER BY id", [])
    }

    fn get_pathways_from_resource(&self, resource_name: &str) -> Result<Vec<Pathway>, StorageError> {
        self.select("WHERE resource_name = ?1 ORDER BY id", params![resource_name])
    }

    fn query_pathway_by_name(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Pathway>, StorageError> {
        self.select(
            "WHERE instr(lower(name), lower(?1)) > 0 ORDER BY id LIMIT ?2",
            params![query, sql_limit(limit)],
        )
    }

    fn query_pathway_by_name_and_resource(
        &self,
        query: &str,
        resource_name: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Pathway>, StorageError> {
        self.select(
            "WHERE resource_name = ?1 AND instr(lower(name), lower(?2)) > 0 ORDER BY id LIMIT ?3",
            params![resource_name, query, sql_limit(limit)],
        )
    }

    fn count_pathways(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pathways", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn count_pathways_by_resource(&self) -> Result<Vec<(String, usize)>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT resource_name, COUNT(*) FROM pathways GROUP BY resource_name ORDER BY resource_name",
        )?;
        let rows = stmt.query_map([], |row| {
            let resource: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((resource, count as usize))
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn create_pathway(&mut self, pathway: NewPathway) -> Result<Pathway, StorageError> {
        let tx = self.conn.transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM pathways WHERE pathway_id = ?1 AND resource_name = ?2)",
            params![pathway.pathway_id, pathway.resource_name],
            |row| row.get(0),
        )?;
        if exists {
            return Err(StorageError::DuplicatePathway {
                pathway_id: pathway.pathway_id,
                resource: pathway.resource_name,
            });
        }

        let created = Utc::now();
        tx.execute(
            "INSERT INTO pathways (pathway_id, resource_name, name, version, authors, contact, \
             description, blob_version, created, number_of_nodes, number_of_edges, blob) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                pathway.pathway_id,
                pathway.resource_name,
                pathway.name,
                pathway.version,
                pathway.authors,
                pathway.contact,
                pathway.description,
                pathfuse_core::codec::FORMAT_VERSION as i64,
                created,
                pathway.number_of_nodes as i64,
                pathway.number_of_edges as i64,
                pathway.blob,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(
            pathway_id = %pathway.pathway_id,
            resource = %pathway.resource_name,
            id,
            "stored pathway"
        );
        Ok(pathway.into_pathway(id, created))
    }

    fn delete_pathway(
        &mut self,
        pathway_id: &str,
        resource_name: &str,
    ) -> Result<bool, StorageError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM pathways WHERE pathway_id = ?1 AND resource_name = ?2",
            params![pathway_id, resource_name],
        )?;
        tx.commit()?;
        Ok(removed > 0)
    }

    fn delete_pathways_from_resource(&mut self, resource_name: &str) -> Result<usize, StorageError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM pathways WHERE resource_name = ?1",
            params![resource_name],
        )?;
        tx.commit()?;
        Ok(removed)
    }

    fn delete_all_pathways(&mut self) -> Result<usize, StorageError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM pathways", [])?;
        tx.commit()?;
        tracing::info!(removed, "deleted all pathways");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::types::fixtures::new_pathway;

    fn seed(repo: &mut dyn PathwayRepository) {
        for (id, resource, name) in [
            ("hsa04012", "kegg", "ErbB signaling pathway"),
            ("hsa04010", "kegg", "MAPK signaling pathway"),
            ("hsa00010", "kegg", "Glycolysis / Gluconeogenesis"),
            ("R-HSA-177929", "reactome", "Signaling by EGFR"),
            ("WP534", "wikipathways", "Glycolysis and gluconeogenesis"),
        ] {
            repo.create_pathway(new_pathway(id, resource, name)).unwrap();
        }
    }

    #[test]
    fn roundtrip_row() {
        let mut store = SqliteStore::in_memory().unwrap();
        let created = store
            .create_pathway(new_pathway("hsa04012", "kegg", "ErbB signaling pathway"))
            .unwrap();
        let loaded = store.get_pathway_by_id("hsa04012", "kegg").unwrap().unwrap();
        assert_eq!(loaded.id, created.id);
        assert_eq!(loaded.name, created.name);
        assert_eq!(loaded.blob, created.blob);
        assert_eq!(loaded.number_of_nodes, 2);
        assert_eq!(loaded.created.timestamp(), created.created.timestamp());
        assert_eq!(loaded.load_graph().unwrap().edge_count(), 1);
    }

    #[test]
    fn duplicate_pair_is_rejected() {
        let mut store = SqliteStore::in_memory().unwrap();
        store
            .create_pathway(new_pathway("hsa04012", "kegg", "ErbB"))
            .unwrap();
        let err = store
            .create_pathway(new_pathway("hsa04012", "kegg", "ErbB"))
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicatePathway { .. }));
    }

    #[test]
    fn backends_agree() {
        let mut sqlite = SqliteStore::in_memory().unwrap();
        let mut memory = InMemoryStore::new();
        seed(&mut sqlite);
        seed(&mut memory);

        let ids = |v: Vec<Pathway>| v.into_iter().map(|p| p.pathway_id).collect::<Vec<_>>();

        for (query, resource, limit) in [
            ("signaling", "kegg", None),
            ("GLYCOLYSIS", "kegg", None),
            ("glyco", "wikipathways", Some(1)),
            ("signaling", "kegg", Some(1)),
            ("nothing", "reactome", None),
        ] {
            assert_eq!(
                ids(sqlite.query_pathway_by_name_and_resource(query, resource, limit).unwrap()),
                ids(memory.query_pathway_by_name_and_resource(query, resource, limit).unwrap()),
                "query {query:?} in {resource}"
            );
        }
        assert_eq!(
            ids(sqlite.query_pathway_by_name("glycolysis", None).unwrap()),
            ids(memory.query_pathway_by_name("glycolysis", None).unwrap())
        );
        assert_eq!(sqlite.count_pathways().unwrap(), memory.count_pathways().unwrap());
        assert_eq!(
            sqlite.count_pathways_by_resource().unwrap(),
            memory.count_pathways_by_resource().unwrap()
        );
        assert_eq!(
            ids(sqlite.get_pathways_from_resource("kegg").unwrap()),
            ids(memory.get_pathways_from_resource("kegg").unwrap())
        );
        assert_eq!(
            sqlite
                .get_pathway_by_name("Signaling by EGFR", "reactome")
                .unwrap()
                .map(|p| p.pathway_id),
            Some("R-HSA-177929".to_string())
        );
    }

    #[test]
    fn deletes() {
        let mut store = SqliteStore::in_memory().unwrap();
        seed(&mut store);
        assert!(store.delete_pathway("hsa04010", "kegg").unwrap());
        assert!(!store.delete_pathway("hsa04010", "kegg").unwrap());
        assert_eq!(store.delete_pathways_from_resource("kegg").unwrap(), 2);
        assert_eq!(store.delete_all_pathways().unwrap(), 2);
        assert_eq!(store.count_pathways().unwrap(), 0);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathways.db");
        let path = path.to_str().unwrap();
        {
            let mut store = SqliteStore::new(path).unwrap();
            seed(&mut store);
        }
        let store = SqliteStore::new(path).unwrap();
        assert_eq!(store.count_pathways().unwrap(), 5);
    }
}
