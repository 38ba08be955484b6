//! Command implementations.
//!
//! Machine-readable output (JSON, HTML) goes to stdout; progress, warnings
//! and hints go through `log!` on stderr.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use super::args::{Commands, PaginationArgs, RenderArgs, ThemeAction};
use crate::log;
use crate::plugin::{ActionReport, Plugin};
use crate::render::blocks::{Block, Pagination};
use crate::render::{RenderContext, Stage, toc};
use crate::settings::Warning;
use crate::settings::page::Tab;
use crate::store::Document;
use crate::theme::{BackupStatus, RestoreOutcome, SyncOutcome};

pub fn run(command: &Commands, plugin: &Plugin) -> Result<()> {
    match command {
        Commands::Show { module } => print_json(&plugin.show(*module)?),
        Commands::Save { module, set, input } => save(plugin, *module, set, input.as_deref()),
        Commands::Reset => {
            report(&plugin.reset_colors()?);
            Ok(())
        }
        Commands::Pull => {
            match plugin.pull_colors()? {
                Some(action) => report(&action),
                None => log!("hint"; "theme.json has no recognised palette colors, nothing pulled"),
            }
            Ok(())
        }
        Commands::Theme { action } => theme(plugin, *action),
        Commands::Render { args } => render(plugin, args),
        Commands::Admin { tab } => {
            println!("{}", plugin.settings_page(tab.as_deref(), &[])?);
            Ok(())
        }
        Commands::Palette => print_json(&plugin.editor_palette()?),
        Commands::Category {
            id,
            enable,
            disable,
            input,
        } => category(plugin, id.as_deref(), *enable, *disable, input.as_deref()),
        Commands::Toc { file, list } => toc_file(file, *list),
        Commands::Block { block, pagination } => {
            let ctx = plugin.render_context();
            let pagination = pagination_of(*block, pagination);
            println!("{}", plugin.render_block(*block, pagination.as_ref(), &ctx)?);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn log_warnings(warnings: &[Warning]) {
    for warning in warnings {
        log!("sanitize"; "{}", warning);
    }
}

fn report(action: &ActionReport) {
    log_warnings(&action.warnings);
    log!("saved"; "{}", action.notice);
}

// ============================================================================
// Settings
// ============================================================================

/// Submitted fields: the `--input` document, then each `--set` pair.
fn submission(set: &[(String, String)], input: Option<&Path>) -> Result<Document> {
    let mut raw = match input {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match serde_json::from_str::<Value>(&content)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
            {
                Value::Object(map) => map,
                _ => anyhow::bail!("{} must contain a JSON object", path.display()),
            }
        }
        None => Document::new(),
    };
    for (key, value) in set {
        raw.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(raw)
}

fn save(plugin: &Plugin, module: Tab, set: &[(String, String)], input: Option<&Path>) -> Result<()> {
    let raw = submission(set, input)?;
    let warnings = plugin.save(module, &raw)?;
    log_warnings(&warnings);
    log!("saved"; "{} settings saved", module.slug());
    Ok(())
}

fn category(
    plugin: &Plugin,
    id: Option<&str>,
    enable: bool,
    disable: bool,
    input: Option<&Path>,
) -> Result<()> {
    let Some(id) = id else {
        println!("{}", plugin.category_field(None)?);
        return Ok(());
    };
    let enabled = match input {
        Some(path) => plugin.save_category_field(id, &submission(&[], Some(path))?)?,
        None if enable || disable => {
            plugin.set_category_toc(id, enable)?;
            enable
        }
        None => {
            println!("{}", plugin.category_field(Some(id))?);
            return Ok(());
        }
    };
    log!("saved"; "page navigation {} for category {}", if enabled { "on" } else { "off" }, id);
    Ok(())
}

// ============================================================================
// Theme config
// ============================================================================

fn theme(plugin: &Plugin, action: ThemeAction) -> Result<()> {
    match action {
        ThemeAction::Backup => match plugin.ensure_backup()? {
            BackupStatus::Created => log!("theme"; "backup created at {}", plugin.theme().backup_path().display()),
            BackupStatus::Exists => log!("theme"; "backup already exists, left untouched"),
            BackupStatus::NoSource => log!("hint"; "{} not found, nothing to back up", plugin.theme().theme_config().display()),
        },
        ThemeAction::Sync => match plugin.sync_palette()? {
            SyncOutcome::Written { updated, changed: true } => {
                log!("theme"; "palette synced ({} colors)", updated)
            }
            SyncOutcome::Written { changed: false, .. } => log!("theme"; "palette already up to date"),
            SyncOutcome::Skipped(reason) => log!("hint"; "sync skipped: {}", reason),
        },
        ThemeAction::Restore => match plugin.restore_theme()? {
            RestoreOutcome::Restored => log!("restore"; "theme.json restored from backup"),
            RestoreOutcome::NoBackup => log!("hint"; "no backup at {}", plugin.theme().backup_path().display()),
        },
        ThemeAction::Status => {
            let status = plugin.theme_status()?;
            let exists = |yes: bool| if yes { "present" } else { "missing" };
            println!("theme config: {} ({})", status.theme_config.display(), exists(status.theme_exists));
            println!("backup:       {} ({})", status.backup.display(), exists(status.backup_exists));
            match status.palette_len {
                Some(len) => println!("palette:      {len} entries"),
                None => println!("palette:      none"),
            }
        }
    }
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn render(plugin: &Plugin, args: &RenderArgs) -> Result<()> {
    print!("{}", render_output(plugin, args)?);
    Ok(())
}

/// Injected page, filtered content, or the stages one after another.
fn render_output(plugin: &Plugin, args: &RenderArgs) -> Result<String> {
    let ctx = RenderContext {
        singular: args.singular,
        post_type: Some(args.post_type.clone()),
        categories: args.categories.clone(),
        ..plugin.render_context()
    };

    if let Some(path) = &args.page {
        return plugin.render_page(&read_file(path)?, &ctx);
    }
    if let Some(path) = &args.content {
        return plugin.render_content(&read_file(path)?, &ctx);
    }

    let pipeline = plugin.pipeline();
    let stages = match args.stage {
        Some(stage) => vec![stage],
        None => Stage::ALL.to_vec(),
    };
    let mut out = String::new();
    for stage in stages {
        let output = pipeline.render_stage(stage, &ctx)?;
        if !output.is_empty() {
            out.push_str(&format!("<!-- {stage} -->\n{output}"));
        }
    }
    Ok(out)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn toc_file(path: &Path, list: bool) -> Result<()> {
    let content = read_file(path)?;
    let content = toc::add_heading_ids(&content);
    if list {
        println!("{}", toc::render_toc_list(&toc::headings(&content)));
    } else {
        print!("{content}");
    }
    Ok(())
}

fn pagination_of(block: Block, args: &PaginationArgs) -> Option<Pagination> {
    match (block, args.total) {
        (Block::LoadToggle, Some(total)) => Some(Pagination::new(args.current, total, args.base.clone())),
        _ => None,
    }
}
