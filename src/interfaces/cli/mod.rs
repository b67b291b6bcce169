//! CLI interface module
//!
//! Drives a [`LinkConfigStore`] from parsed command-line input. Paths given
//! on the command line are fed to the store through a [`PresetDialog`], so
//! the CLI goes through the same selection flow as an interactive picker.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::LinkerError;
use crate::host::{LinkHost, LocalHost, PresetDialog};
use crate::link::LinkConfigStore;
use commands::{
    add_link, config_management, list_files, list_links, list_types, remove_links,
};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<LinkerError> for CliError {
    fn from(err: LinkerError) -> Self {
        match err {
            LinkerError::Validation(msg) => CliError::ParseError(msg),
            LinkerError::Serialization(msg) | LinkerError::Config(msg) => {
                CliError::StorageError(msg)
            }
            other => CliError::CommandError(other.format_simple()),
        }
    }
}

/// Store and dialog wired to the local host
pub struct CliContext {
    pub store: LinkConfigStore,
    pub dialog: Arc<PresetDialog>,
}

impl CliContext {
    pub async fn from_config(config: &StaticConfig) -> Result<Self, CliError> {
        let host = LocalHost::from_config(config)
            .map_err(|e| CliError::StorageError(e.to_string()))?;
        debug!("Using host backend: {}", host.backend_name().await);

        Ok(Self::new(Arc::new(host), config))
    }

    pub fn new(host: Arc<dyn LinkHost>, config: &StaticConfig) -> Self {
        let dialog = Arc::new(PresetDialog::new());
        let store = LinkConfigStore::new(host, dialog.clone())
            .with_reset_policy(config.draft.reset_policy());
        Self { store, dialog }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    match cmd {
        Commands::Types => {
            list_types();
            Ok(())
        }

        Commands::Link {
            link_type,
            source,
            target,
            name,
            lname,
        } => {
            let ctx = CliContext::from_config(config).await?;
            add_link(&ctx, link_type, source, target, name, lname).await
        }

        Commands::List => list_links(&CliContext::from_config(config).await?).await,

        Commands::Files { id, all } => {
            list_files(&CliContext::from_config(config).await?, &id, all).await
        }

        Commands::Remove { ids } => {
            remove_links(&CliContext::from_config(config).await?, ids).await
        }

        // Generate doesn't need the record store
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_management::config_generate(output_path, force).await,
    }
}
