//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for symlinker using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::link::LinkTypeVariant;

/// Symlinker - create and track symbolic and hard links
#[derive(Parser)]
#[command(name = "symlinker")]
#[command(version)]
#[command(about = "Create and track symbolic and hard links", long_about = None)]
pub struct Cli {
    /// Configuration file (default: symlinker.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the available link types
    Types,

    /// Create links and record them
    ///
    /// Usage: link --type <TYPE> --source <PATH>... --target <DIR>
    Link {
        /// Link type: tag (0-8), name (e.g. dir-all-files) or label
        #[arg(long = "type", short = 't', default_value = "file")]
        link_type: LinkTypeVariant,

        /// Source path(s); only multi-source types accept more than one
        #[arg(long, short = 's', required = true, num_args = 1..)]
        source: Vec<String>,

        /// Target directory
        #[arg(long, short = 'd')]
        target: String,

        /// Custom name for the created link (single-source types only)
        #[arg(long)]
        name: Option<String>,

        /// Display name stored on the record
        #[arg(long)]
        lname: Option<String>,
    },

    /// List recorded links
    List,

    /// Show the files created for a record
    Files {
        /// Record id or files id
        id: String,

        /// Also show the record itself
        #[arg(long)]
        all: bool,
    },

    /// Remove recorded links and the links they created
    Remove {
        /// Record ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: symlinker.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
