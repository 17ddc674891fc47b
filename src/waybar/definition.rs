//! The module definition entry (`"custom/wizado": { ... }`)

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use super::jsonc::ConfigDocument;

/// Identifier of the wizado bar module
pub const MODULE_ID: &str = "custom/wizado";

/// Fields of a module definition, merged key by key
pub type ModuleFields = Map<String, Value>;

/// Result of writing a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionChange {
    Created,
    Updated,
}

/// Merge `fields` into the definition for `module_id`, creating it if absent
///
/// Keys present in both are overwritten; keys only in the existing definition
/// are kept. A definition that is not an object is replaced.
pub fn upsert_module_definition(
    doc: &mut ConfigDocument,
    module_id: &str,
    fields: ModuleFields,
) -> DefinitionChange {
    match doc.get_mut(module_id) {
        Some(Value::Object(existing)) => {
            for (key, value) in fields {
                existing.insert(key, value);
            }
            DefinitionChange::Updated
        }
        _ => {
            doc.insert(module_id.to_string(), Value::Object(fields));
            DefinitionChange::Created
        }
    }
}

/// Upsert where `defaults` only fill keys the definition lacks and
/// `overrides` always win
pub fn ensure_module_definition(
    doc: &mut ConfigDocument,
    module_id: &str,
    defaults: ModuleFields,
    overrides: ModuleFields,
) -> DefinitionChange {
    let mut fields: ModuleFields = match doc.get(module_id) {
        Some(Value::Object(existing)) => defaults
            .into_iter()
            .filter(|(key, _)| !existing.contains_key(key))
            .collect(),
        _ => defaults,
    };
    fields.extend(overrides);

    upsert_module_definition(doc, module_id, fields)
}

/// Waybar `custom/*` module settings for wizado
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct WizadoModule {
    pub format: String,
    pub return_type: String,
    pub exec: String,
    pub interval: u64,
    pub on_click: String,
    pub on_click_right: String,
    pub on_click_middle: String,
    pub tooltip: bool,

    /// Fields that replace an existing value instead of only filling gaps
    #[serde(skip)]
    pub forced: Vec<&'static str>,
}

impl WizadoModule {
    /// Settings for the standard install layout
    ///
    /// `terminal` is the prefix that runs a command in a terminal, e.g.
    /// `kitty -e`.
    pub fn for_install(terminal: &str) -> Result<Self> {
        let status = crate::config::status_script()?;
        let menu = crate::config::menu_script()?;
        let enter = crate::config::enter_gamesmode_script()?;
        let leave = crate::config::leave_gamesmode_script()?;

        Ok(Self {
            format: "{}".to_string(),
            return_type: "json".to_string(),
            exec: status.display().to_string(),
            interval: 2,
            on_click: format!("{} {}", terminal, menu.display()),
            on_click_right: format!("{} --mode tty", enter.display()),
            on_click_middle: leave.display().to_string(),
            tooltip: true,
            forced: vec!["format", "on-click"],
        })
    }

    /// Replace the status command and always write it
    pub fn exec(mut self, exec: impl Into<String>) -> Self {
        self.exec = exec.into();
        self.forced.push("exec");
        self
    }

    /// Replace the poll interval and always write it
    pub fn interval(mut self, secs: u64) -> Self {
        self.interval = secs;
        self.forced.push("interval");
        self
    }

    /// Every field, used when the definition is new or a field is missing
    pub fn defaults(&self) -> Result<ModuleFields> {
        match serde_json::to_value(self).context("Failed to serialize module definition")? {
            Value::Object(fields) => Ok(fields),
            other => anyhow::bail!("module definition serialized to {}", other),
        }
    }

    /// Fields that are rewritten even when the definition already has them
    pub fn overrides(&self) -> Result<ModuleFields> {
        let defaults = self.defaults()?;
        Ok(defaults
            .into_iter()
            .filter(|(key, _)| self.forced.iter().any(|forced| *forced == key.as_str()))
            .collect())
    }

    /// Write this definition into `doc` under `module_id`
    pub fn apply(&self, doc: &mut ConfigDocument, module_id: &str) -> Result<DefinitionChange> {
        Ok(ensure_module_definition(
            doc,
            module_id,
            self.defaults()?,
            self.overrides()?,
        ))
    }
}
