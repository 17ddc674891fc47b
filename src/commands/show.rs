//! Show command - Report where a module sits in the Waybar config

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use wizado_waybar::config;
use wizado_waybar::waybar::placement::find_module;
use wizado_waybar::waybar::{jsonc, locate_drawer_group, ConfigDocument, PlacementPolicy};

/// Placement summary for one module
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ModuleReport {
    pub config: PathBuf,
    pub module: String,
    /// Lists (flat or group) containing the module
    pub locations: Vec<String>,
    pub has_definition: bool,
    /// Drawer group a patch would use
    pub drawer: Option<String>,
}

impl ModuleReport {
    /// At most one location and a definition whenever placed
    pub fn is_consistent(&self) -> bool {
        self.locations.len() <= 1 && (self.locations.is_empty() || self.has_definition)
    }
}

/// Inspect `doc` for `module_id`
pub fn inspect(
    path: &Path,
    doc: &ConfigDocument,
    module_id: &str,
    policy: &PlacementPolicy,
) -> ModuleReport {
    ModuleReport {
        config: path.to_path_buf(),
        module: module_id.to_string(),
        locations: find_module(doc, module_id, &policy.group_prefix),
        has_definition: matches!(doc.get(module_id), Some(Value::Object(_))),
        drawer: locate_drawer_group(doc, policy),
    }
}

/// Execute the show command
pub fn execute(config_path: Option<&Path>, module_id: &str, json: bool) -> Result<()> {
    let path = config::resolve_waybar_config(config_path)?;
    let doc = jsonc::load(&path)?;
    let report = inspect(&path, &doc, module_id, &PlacementPolicy::default());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Config: {}", report.config.display());
    println!("Module: {}", report.module);

    if report.locations.is_empty() {
        println!("  {} not placed in any module list", "Missing:".yellow());
    }
    for location in &report.locations {
        println!("  {} {}", "Found in:".green(), location);
    }

    if report.has_definition {
        println!("  {} present", "Definition:".green());
    } else {
        println!("  {} missing", "Definition:".yellow());
    }

    match &report.drawer {
        Some(group) => println!("  Drawer group: {}", group),
        None => println!("  Drawer group: {}", "none".dimmed()),
    }

    if !report.is_consistent() {
        println!(
            "\n{} run `wizado-waybar patch` to fix the placement",
            "Warning:".yellow()
        );
    }

    Ok(())
}
