//! Subcommand implementations. Each returns the process exit code and
//! writes its result to `out`; diagnostics go to stderr.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::{json, Map, Value};

use pathfuse_analysis::{merge_pathways, AnalysisError, PathwaySelection};
use pathfuse_core::export::export;
use pathfuse_core::{codec, CoreError, ExportFormat, Payload};
use pathfuse_storage::{
    ManagerRegistry, NewPathway, PathwayRepository, SqliteStore, StorageError, DEFAULT_RESOURCES,
};

pub const EXIT_OK: i32 = 0;
pub const EXIT_INPUT: i32 = 1;
pub const EXIT_NOT_FOUND: i32 = 2;
pub const EXIT_IO: i32 = 3;

/// Which stored pathways `export` merges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    All,
    Selected {
        pathway_ids: Vec<String>,
        resources: Vec<String>,
    },
}

/// The resource registry for `resources`, or the default resources when
/// none are named.
pub fn registry(resources: &[String]) -> ManagerRegistry {
    let named: Vec<&str> = resources
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();
    if named.is_empty() {
        ManagerRegistry::from_resources(DEFAULT_RESOURCES)
    } else {
        ManagerRegistry::from_resources(named)
    }
}

fn open_store(db_path: &str) -> Result<SqliteStore, i32> {
    SqliteStore::new(db_path).map_err(|e| {
        eprintln!("Error: failed to open database '{}': {}", db_path, e);
        EXIT_IO
    })
}

fn storage_exit(e: &StorageError) -> i32 {
    match e {
        StorageError::PathwayNotFound { .. } => EXIT_NOT_FOUND,
        StorageError::UnknownResource { .. } | StorageError::ResourceMismatch { .. } => EXIT_INPUT,
        _ => EXIT_IO,
    }
}

fn analysis_exit(e: &AnalysisError) -> i32 {
    match e {
        AnalysisError::EmptySelection => EXIT_INPUT,
        AnalysisError::PathwayNotFound { .. } => EXIT_NOT_FOUND,
        AnalysisError::Storage(inner) => storage_exit(inner),
        AnalysisError::Core(_) => EXIT_IO,
    }
}

// ---------------------------------------------------------------------------
// import
// ---------------------------------------------------------------------------

/// Decodes `file` and stores it through the manager of `resource`. A
/// pathway that is already stored is left as it is.
pub fn run_import(
    registry: &ManagerRegistry,
    db_path: &str,
    resource: &str,
    pathway_id: &str,
    file: &Path,
    name: Option<String>,
    out: &mut dyn Write,
) -> i32 {
    let manager = match registry.require(resource) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_INPUT;
        }
    };

    let blob = match fs::read(file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", file.display(), e);
            return EXIT_IO;
        }
    };
    let graph = match codec::load(&blob) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: '{}' is not a pathway graph: {}", file.display(), e);
            return EXIT_INPUT;
        }
    };

    let mut pathway = match NewPathway::from_graph(pathway_id, resource, &graph) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: failed to encode pathway: {}", e);
            return EXIT_IO;
        }
    };
    if let Some(name) = name {
        pathway = pathway.with_name(name);
    }

    let mut store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match manager.import(&mut store, pathway) {
        Ok(stored) => {
            tracing::info!(
                pathway_id = %stored.pathway_id,
                resource = %stored.resource_name,
                "imported pathway"
            );
            let summary = json!({
                "pathway_id": stored.pathway_id,
                "resource": stored.resource_name,
                "name": stored.name,
                "nodes": stored.number_of_nodes,
                "edges": stored.number_of_edges,
            });
            write_json(out, &summary)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            storage_exit(&e)
        }
    }
}

// ---------------------------------------------------------------------------
// summarize / drop
// ---------------------------------------------------------------------------

/// Prints `{"total": n, "resources": {resource: count}}`.
pub fn run_summarize(db_path: &str, out: &mut dyn Write) -> i32 {
    let store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let counts = match (store.count_pathways(), store.count_pathways_by_resource()) {
        (Ok(total), Ok(per_resource)) => (total, per_resource),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            return EXIT_IO;
        }
    };

    let mut resources = Map::new();
    for (resource, count) in counts.1 {
        resources.insert(resource, json!(count));
    }
    write_json(out, &json!({ "total": counts.0, "resources": resources }))
}

/// Deletes every stored pathway. Refuses without `yes`.
pub fn run_drop(db_path: &str, yes: bool, out: &mut dyn Write) -> i32 {
    if !yes {
        eprintln!("Error: refusing to delete all pathways without --yes");
        return EXIT_INPUT;
    }
    let mut store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match store.delete_all_pathways() {
        Ok(deleted) => {
            tracing::info!(deleted, "deleted all pathways");
            write_json(out, &json!({ "deleted": deleted }))
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_IO
        }
    }
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

/// Merges the target pathways and writes them in `format`, to `output` if
/// given and to `out` otherwise.
pub fn run_export(
    db_path: &str,
    target: ExportTarget,
    format: &str,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> i32 {
    let format: ExportFormat = match format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_INPUT;
        }
    };

    let store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let selection = match target {
        ExportTarget::All => match store.get_all_pathways() {
            Ok(pathways) => PathwaySelection::from_pairs(
                pathways
                    .into_iter()
                    .map(|p| (p.pathway_id, p.resource_name)),
            ),
            Err(e) => {
                eprintln!("Error: {}", e);
                return EXIT_IO;
            }
        },
        ExportTarget::Selected {
            pathway_ids,
            resources,
        } => {
            if pathway_ids.len() != resources.len() {
                eprintln!(
                    "Error: got {} --pathway-id and {} --resource values",
                    pathway_ids.len(),
                    resources.len()
                );
                return EXIT_INPUT;
            }
            PathwaySelection::from_pairs(pathway_ids.into_iter().zip(resources))
        }
    };

    let merged = match merge_pathways(&store, &selection) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return analysis_exit(&e);
        }
    };

    let bytes = match export(&merged, format).and_then(payload_bytes) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: export failed: {}", e);
            return EXIT_IO;
        }
    };

    let written = match output {
        Some(path) => fs::write(path, &bytes),
        None => out.write_all(&bytes),
    };
    match written {
        Ok(()) => EXIT_OK,
        Err(e) => {
            eprintln!("Error: failed to write export: {}", e);
            EXIT_IO
        }
    }
}

fn payload_bytes(payload: Payload) -> Result<Vec<u8>, CoreError> {
    match payload {
        Payload::Json(value) => {
            let mut body = serde_json::to_vec_pretty(&value).map_err(|e| CoreError::Export {
                reason: e.to_string(),
            })?;
            body.push(b'\n');
            Ok(body)
        }
        Payload::Text { body, .. } => Ok(body.into_bytes()),
        Payload::Attachment { body, .. } => Ok(body),
    }
}

fn write_json(out: &mut dyn Write, value: &Value) -> i32 {
    match writeln!(out, "{:#}", value) {
        Ok(()) => EXIT_OK,
        Err(e) => {
            eprintln!("Error: failed to write output: {}", e);
            EXIT_IO
        }
    }
}
