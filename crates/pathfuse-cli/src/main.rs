//! Pathway repository CLI.
//!
//! Provides the `pathfuse` binary for managing the pathway database the
//! server reads from: importing encoded graphs, summarizing and dropping
//! the stored pathways, and exporting merged graphs without the HTTP layer.
//!
//! Exit codes: 0 = success, 1 = input error, 2 = not found,
//! 3 = I/O or storage error.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// Pathway repository management tools.
#[derive(Parser)]
#[command(name = "pathfuse", about = "Pathway repository management tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Import an encoded pathway graph.
    Import {
        /// Path to the pathway database file.
        #[arg(short, long)]
        db: String,

        /// Resource the pathway belongs to (kegg, reactome, wikipathways).
        #[arg(short, long)]
        resource: String,

        /// Identifier of the pathway within its resource.
        #[arg(short, long)]
        pathway_id: String,

        /// Graph blob produced by the `bytes` export format.
        #[arg(short, long)]
        file: PathBuf,

        /// Display name (default: the graph's own name).
        #[arg(short, long)]
        name: Option<String>,

        /// Registered resources, comma separated (default: kegg,reactome,wikipathways).
        #[arg(long, env = "PATHFUSE_RESOURCES", value_delimiter = ',')]
        resources: Vec<String>,
    },

    /// Print the number of stored pathways per resource.
    Summarize {
        /// Path to the pathway database file.
        #[arg(short, long)]
        db: String,
    },

    /// Delete every stored pathway.
    Drop {
        /// Path to the pathway database file.
        #[arg(short, long)]
        db: String,

        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Merge stored pathways and write them in an export format.
    Export {
        /// Path to the pathway database file.
        #[arg(short, long)]
        db: String,

        /// Merge every stored pathway.
        #[arg(long, conflicts_with_all = ["pathway_id", "resource"])]
        all: bool,

        /// Pathway to include (repeatable, paired with --resource).
        #[arg(short, long)]
        pathway_id: Vec<String>,

        /// Resource of the matching --pathway-id (repeatable).
        #[arg(short, long)]
        resource: Vec<String>,

        /// json, bytes, bel, graphml or csv.
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    let exit_code = match cli.command {
        Commands::Import {
            db,
            resource,
            pathway_id,
            file,
            name,
            resources,
        } => {
            let registry = commands::registry(&resources);
            commands::run_import(&registry, &db, &resource, &pathway_id, &file, name, &mut stdout)
        }
        Commands::Summarize { db } => commands::run_summarize(&db, &mut stdout),
        Commands::Drop { db, yes } => commands::run_drop(&db, yes, &mut stdout),
        Commands::Export {
            db,
            all,
            pathway_id,
            resource,
            format,
            output,
        } => {
            let target = if all {
                commands::ExportTarget::All
            } else {
                commands::ExportTarget::Selected {
                    pathway_ids: pathway_id,
                    resources: resource,
                }
            };
            commands::run_export(&db, target, &format, output.as_deref(), &mut stdout)
        }
    };
    process::exit(exit_code);
}
