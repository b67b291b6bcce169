//! Create link command

use colored::Colorize;

use super::helpers::absolutize;
use crate::interfaces::cli::{CliContext, CliError};
use crate::link::LinkTypeVariant;

pub async fn add_link(
    ctx: &CliContext,
    link_type: LinkTypeVariant,
    sources: Vec<String>,
    target: String,
    name: Option<String>,
    lname: Option<String>,
) -> Result<(), CliError> {
    let traits = link_type.traits();
    if sources.len() > 1 && !traits.allows_multiple_sources {
        return Err(CliError::ParseError(format!(
            "Link type '{}' takes a single source, got {}",
            link_type,
            sources.len()
        )));
    }
    if name.is_some() && traits.name_disabled() {
        println!(
            "{} Link type '{}' does not support --name, ignoring it",
            "⚠".bold().yellow(),
            link_type
        );
    }

    let sources = sources
        .iter()
        .map(|s| absolutize(s))
        .collect::<Result<Vec<_>, _>>()?;
    let target = absolutize(&target)?;

    let store = &ctx.store;
    store.select_variant(link_type);

    // 命令行参数作为对话框的选择结果
    ctx.dialog.push_paths(sources);
    ctx.dialog.push_paths(vec![target]);
    if !store.select_source().await? || !store.select_target().await? {
        return Err(CliError::CommandError(
            "Path selection was cancelled".to_string(),
        ));
    }

    if let Some(name) = name {
        store.set_display_name(name);
    }
    if let Some(lname) = lname {
        store.set_link_name(lname);
    }

    let draft = store.draft();
    store.create_link().await?;

    println!(
        "{} Created {} link: {} -> {}",
        "✓".bold().green(),
        draft.variant.label().cyan(),
        draft.source_paths.join(", ").blue(),
        draft.target_path.blue().underline()
    );
    println!(
        "{} Total {} recorded links",
        "ℹ".bold().blue(),
        store.listing().len().to_string().green()
    );
    Ok(())
}
