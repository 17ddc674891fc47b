//! Patch command - Add the wizado module to the Waybar config

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use wizado_waybar::config;
use wizado_waybar::terminal;
use wizado_waybar::waybar::definition::DefinitionChange;
use wizado_waybar::waybar::{
    ensure_module_placement, jsonc, ConfigDocument, Placement, PlacementPolicy, WizadoModule,
};

/// Options for the patch command
#[derive(Debug, Clone)]
pub struct PatchOptions {
    /// Config file to patch (default: ~/.config/waybar/config.jsonc)
    pub config: Option<PathBuf>,
    pub module_id: String,
    pub policy: PlacementPolicy,
    /// Terminal prefix; detected from PATH if omitted
    pub terminal: Option<String>,
    pub menu: Option<PathBuf>,
    pub exec: Option<String>,
    pub interval: Option<u64>,
    pub dry_run: bool,
    pub backup: bool,
    pub reload: bool,
}

/// What a patch run changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub placement: Placement,
    pub definition: DefinitionChange,
}

/// Execute the patch command
pub fn execute(options: &PatchOptions) -> Result<()> {
    let path = config::resolve_waybar_config(options.config.as_deref())?;

    let terminal = match &options.terminal {
        Some(terminal) => terminal.clone(),
        None => terminal::detect_terminal(),
    };
    println!("{} {}", terminal_label(options.terminal.is_some()), terminal);

    let module = build_module(&terminal, options)?;

    println!("Reading {}", path.display());
    let report = patch_file(&path, &module, options)?;
    print_report(&report);

    if options.dry_run {
        println!("\n{}", "(DRY-RUN) No changes made.".blue());
        return Ok(());
    }

    println!("{}", "Patch success".green());

    if options.reload {
        reload_waybar();
    }

    Ok(())
}

fn terminal_label(explicit: bool) -> &'static str {
    if explicit {
        "Using terminal:"
    } else {
        "Detected terminal:"
    }
}

/// Whether `path` itself is a symlink (not just reached through one)
fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

fn build_module(terminal: &str, options: &PatchOptions) -> Result<WizadoModule> {
    let mut module = WizadoModule::for_install(terminal)?;

    if let Some(menu) = &options.menu {
        module.on_click = format!("{} {}", terminal, menu.display());
    }
    if let Some(exec) = &options.exec {
        module = module.exec(exec.as_str());
    }
    if let Some(interval) = options.interval {
        module = module.interval(interval);
    }

    Ok(module)
}

/// Apply placement and definition to a document in memory
pub fn patch_document(
    doc: &mut ConfigDocument,
    module: &WizadoModule,
    module_id: &str,
    policy: &PlacementPolicy,
) -> Result<PatchReport> {
    let definition = module.apply(doc, module_id)?;
    let placement = ensure_module_placement(doc, module_id, policy)
        .with_context(|| format!("Cannot place {}", module_id))?;

    Ok(PatchReport {
        placement,
        definition,
    })
}

/// Load, patch and (unless dry-run) rewrite the config at `path`
///
/// Nothing is written unless the document parsed, patched and serialized
/// cleanly.
pub fn patch_file(
    path: &Path,
    module: &WizadoModule,
    options: &PatchOptions,
) -> Result<PatchReport> {
    let mut doc = jsonc::load(path)?;
    let report = patch_document(&mut doc, module, &options.module_id, &options.policy)?;

    if options.dry_run {
        println!("{}", jsonc::serialize_document(&doc)?);
        return Ok(report);
    }

    if options.backup {
        let backup = backup_path(path, Local::now());
        fs::copy(path, &backup)
            .with_context(|| format!("Failed to back up to: {}", backup.display()))?;
        println!("{} {}", "Backup:".green(), backup.display());
    }

    println!("Patching config file...");
    let linked = is_symlink(path);
    let written = jsonc::save(path, &doc)?;
    if linked {
        println!("{} wrote through to {}", "Note:".yellow(), written.display());
    }

    Ok(report)
}

/// `<file>.bak-YYYYmmdd-HHMMSS` next to the config
pub fn backup_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".bak-{}", now.format("%Y%m%d-%H%M%S")));
    path.with_file_name(name)
}

fn print_report(report: &PatchReport) {
    match report.definition {
        DefinitionChange::Created => println!("{} module definition", "Created:".green()),
        DefinitionChange::Updated => println!("{} module definition", "Updated:".green()),
    }

    match &report.placement {
        Placement::Drawer {
            group,
            inserted,
            sentinel_added,
            removed_from,
        } => {
            if *inserted {
                println!("{} module to drawer {}", "Added:".green(), group);
            } else {
                println!("Module already in drawer {}", group);
            }
            if *sentinel_added {
                println!("  Added expand icon in front of it");
            }
            for list in removed_from {
                println!("  Removed from {}", list.dimmed());
            }
        }
        Placement::Flat {
            list,
            inserted,
            removed_from,
        } => {
            if *inserted {
                println!("{} module to {}", "Added:".green(), list);
            } else {
                println!("Module already in {}", list);
            }
            for other in removed_from {
                println!("  Removed from {}", other.dimmed());
            }
        }
    }
}

/// Restart Waybar so it picks up the new config
fn reload_waybar() {
    println!("Restarting Waybar...");

    // pkill exits 1 when nothing matched, which is fine
    let _ = Command::new("pkill").arg("waybar").status();

    let spawned = Command::new("waybar")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    if let Err(e) = spawned {
        eprintln!("{} could not start waybar: {}", "Warning:".yellow(), e);
    }
}
