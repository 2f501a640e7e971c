use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Org chart maintenance for the Entropy Gaming dashboard.
///
/// Works on the flat JSON people list the dashboard renders its org chart
/// from.
#[derive(Parser, Debug)]
#[command(name = "entropy-orgchart")]
#[command(version)]
#[command(about = "Org chart maintenance for the Entropy Gaming dashboard")]
pub struct Cli {
    /// Path to the org chart JSON file
    #[arg(long, global = true, env = "ORGCHART_DATA_FILE", default_value = "data/orgchart.json")]
    pub file: PathBuf,

    /// Enable debug logging to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check ids, parent references, cycles and reachability
    Validate,

    /// Show people, position and level statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the hierarchy as an indented outline
    Hierarchy,

    /// Write the sample organisation to the file
    CreateSample,

    /// Add a person with the next free id
    Add {
        /// Display name
        name: String,
        /// Position title
        position: String,
        /// Parent ids
        #[arg(long = "parent", value_name = "ID")]
        parents: Vec<i64>,
    },

    /// Remove a person and every reference to them
    Remove {
        /// Person id
        id: i64,
    },

    /// Change a person's name, position or parents
    Update {
        /// Person id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        /// Replace the parent ids
        #[arg(long = "parent", value_name = "ID")]
        parents: Option<Vec<i64>>,
        /// Make the person a root
        #[arg(long, conflicts_with = "parents")]
        no_parents: bool,
    },
}
