//! Listing commands

use colored::Colorize;

use crate::interfaces::cli::{CliContext, CliError};
use crate::link::{LinkConfiguration, catalog};

pub fn list_types() {
    println!("{}", "Link types:".bold().green());
    println!();
    for entry in catalog() {
        let traits = entry.traits;
        let mut flags = vec![if traits.source_is_directory {
            "directory"
        } else {
            "file"
        }];
        if entry.variant.is_hard() {
            flags.push("hard link");
        }
        if traits.allows_multiple_sources {
            flags.push("multiple");
        }
        if traits.allows_custom_name {
            flags.push("custom name");
        }

        println!(
            "  {} {:<18} {}",
            entry.variant.wire_tag().to_string().cyan(),
            entry.label,
            format!("({})", flags.join(", ")).dimmed()
        );
    }
}

pub async fn list_links(ctx: &CliContext) -> Result<(), CliError> {
    ctx.store
        .refresh_listing()
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load links: {}", e)))?;
    let links = ctx.store.listing();

    if links.is_empty() {
        println!("{} No links recorded", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Recorded links:".bold().green());
    println!();
    for record in links.iter() {
        let mut info_parts = vec![format!(
            "{} [{}] {} -> {}",
            record.id.cyan(),
            record.link_type.label(),
            record.source.join(", "),
            record.target.blue().underline()
        )];
        if !record.name.is_empty() {
            info_parts.push(format!("\"{}\"", record.name).yellow().to_string());
        }
        info_parts.push(format!("({})", record.time).dimmed().to_string());

        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} recorded links",
        "ℹ".bold().blue(),
        links.len().to_string().green()
    );
    Ok(())
}

pub async fn list_files(ctx: &CliContext, id: &str, all: bool) -> Result<(), CliError> {
    let breakdown = ctx.store.fetch_children(id, all).await?;

    if let Some(mut record) = breakdown.record {
        record.files = breakdown.files.clone();
        let view = LinkConfiguration::from_record(&record);
        println!(
            "{} {} [{}] {}",
            "Record".bold().green(),
            view.id.cyan(),
            view.variant.label(),
            format!("({})", view.created_at).dimmed()
        );
        if !view.link_name.is_empty() {
            println!("  name:   {}", view.link_name.yellow());
        }
        println!("  source: {}", view.source_paths.join(", "));
        println!("  target: {}", view.target_path.blue().underline());
        println!();
    }

    if breakdown.files.is_empty() {
        println!("{} No files recorded for {}", "ℹ".bold().blue(), id.cyan());
        return Ok(());
    }

    for file in &breakdown.files {
        println!(
            "  {} {:<4} {} -> {}",
            file.id.to_string().dimmed(),
            file.kind.as_str(),
            file.target.blue(),
            file.source
        );
    }
    println!();
    println!(
        "{} Total {} files",
        "ℹ".bold().blue(),
        breakdown.files.len().to_string().green()
    );
    Ok(())
}
