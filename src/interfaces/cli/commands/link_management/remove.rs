//! Remove links command

use colored::Colorize;

use crate::interfaces::cli::{CliContext, CliError};
use crate::link::LinkRecord;

pub async fn remove_links(ctx: &CliContext, ids: Vec<String>) -> Result<(), CliError> {
    ctx.store
        .refresh_listing()
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load links: {}", e)))?;
    let listing = ctx.store.listing();

    let mut selected: Vec<LinkRecord> = Vec::with_capacity(ids.len());
    for id in &ids {
        match find_record(&listing, id) {
            Some(record) => selected.push(record.clone()),
            None => {
                return Err(CliError::CommandError(format!(
                    "Link record does not exist: {}",
                    id
                )));
            }
        }
    }

    ctx.store.delete_links(&selected).await?;

    for record in &selected {
        println!(
            "{} Removed link record: {}",
            "✓".bold().green(),
            record.id.cyan()
        );
    }
    Ok(())
}

/// Match by record id or by files id; legacy records without a files id
/// only match by record id.
fn find_record<'a>(listing: &'a [LinkRecord], id: &str) -> Option<&'a LinkRecord> {
    listing
        .iter()
        .find(|r| r.id == id || (!r.files_id.is_empty() && r.files_id == id))
}
