//! # Scholarnet CLI Module
//!
//! This module implements the CLI interface for Scholarnet.
//!
//! ## Available Commands
//!
//! - `status` - Show catalog counts
//! - `affiliations` - List affiliations in a chosen order
//! - `closest` - Affiliations nearest to a point
//! - `publications` - Publications of one affiliation
//! - `connections` - Co-authorship connections
//! - `citations` - Citation chain or references of a publication
//! - `common-parent` - Closest common citing publication
//! - `path` - Path between two affiliations

mod commands;

use crate::dataset;
use clap::{Parser, Subcommand, ValueEnum};
use scholarnet_core::ScholarnetError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Scholarnet - affiliation and publication explorer
///
/// Loads a catalog from a dataset file and answers queries over it.
#[derive(Parser, Debug)]
#[command(name = "scholarnet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Dataset file to load (.json or .toml)
    #[arg(short = 'd', long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Orders for the `affiliations` listing.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffiliationOrder {
    /// By name, ties by identifier
    Name,
    /// By distance from the origin
    Distance,
    /// By identifier
    Id,
}

/// What the `citations` command walks.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationMode {
    /// Every publication citing it, nearest first
    Chain,
    /// Everything it cites, transitively
    All,
    /// Only what it cites directly
    Direct,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show catalog status
    Status,

    /// List affiliations
    Affiliations {
        /// Listing order
        #[arg(short, long, value_enum, default_value_t = AffiliationOrder::Id)]
        order: AffiliationOrder,
    },

    /// Show the affiliations closest to a point
    Closest {
        #[arg(long, allow_hyphen_values = true)]
        x: i32,

        #[arg(long, allow_hyphen_values = true)]
        y: i32,
    },

    /// List the publications of an affiliation
    Publications {
        /// Affiliation identifier
        #[arg(short, long)]
        affiliation: String,

        /// Only publications from this year on
        #[arg(long, allow_hyphen_values = true)]
        after: Option<i32>,
    },

    /// List co-authorship connections
    Connections {
        /// Only connections of this affiliation
        #[arg(short, long)]
        affiliation: Option<String>,
    },

    /// Walk the citation forest from a publication
    Citations {
        /// Publication identifier
        #[arg(short, long)]
        publication: u64,

        /// Traversal mode
        #[arg(short, long, value_enum, default_value_t = CitationMode::Direct)]
        mode: CitationMode,
    },

    /// Find the closest publication citing both
    CommonParent {
        #[arg(long)]
        first: u64,

        #[arg(long)]
        second: u64,
    },

    /// Find a path between two affiliations
    Path {
        /// Search kind (any, fewest, heaviest, shortest)
        #[arg(short, long, default_value = "shortest")]
        kind: String,

        /// Source affiliation
        #[arg(long)]
        from: String,

        /// Target affiliation
        #[arg(long)]
        to: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments, returning the text to print.
pub fn execute(cli: Cli) -> Result<String, ScholarnetError> {
    let catalog = dataset::load_catalog(cli.dataset.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Status) | None => Ok(cmd_status(&catalog, json_mode, cli.verbose)),
        Some(Commands::Affiliations { order }) => Ok(cmd_affiliations(&catalog, json_mode, order)),
        Some(Commands::Closest { x, y }) => Ok(cmd_closest(&catalog, json_mode, x, y)),
        Some(Commands::Publications { affiliation, after }) => {
            cmd_publications(&catalog, json_mode, &affiliation, after)
        }
        Some(Commands::Connections { affiliation }) => {
            cmd_connections(&catalog, json_mode, affiliation.as_deref())
        }
        Some(Commands::Citations { publication, mode }) => {
            cmd_citations(&catalog, json_mode, publication, mode)
        }
        Some(Commands::CommonParent { first, second }) => {
            cmd_common_parent(&catalog, json_mode, first, second)
        }
        Some(Commands::Path { kind, from, to }) => cmd_path(&catalog, json_mode, &kind, &from, &to),
    }
}
