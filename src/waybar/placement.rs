//! Placing a module identifier into the bar layout
//!
//! Waybar lays out modules from three flat lists (`modules-left`,
//! `modules-center`, `modules-right`). Groups (`group/<name>`) hold their own
//! `modules` list and can render as a collapsible drawer. A module id must
//! live in exactly one of these lists.

use serde_json::Value;

use super::error::{kind_of, ShapeError};
use super::jsonc::ConfigDocument;

/// The flat module list keys, in the order they are scanned
pub const FLAT_LISTS: [&str; 3] = ["modules-left", "modules-center", "modules-right"];

/// One of the three flat module lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FlatList {
    Left,
    Center,
    Right,
}

impl FlatList {
    pub fn key(self) -> &'static str {
        match self {
            FlatList::Left => "modules-left",
            FlatList::Center => "modules-center",
            FlatList::Right => "modules-right",
        }
    }
}

/// Which side of the anchor module the new id goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSide {
    Before,
    After,
}

/// Where and how a module id should be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementPolicy {
    /// Look for a drawer group before falling back to a flat list
    pub use_drawer: bool,
    /// Drawer checked first (Omarchy ships `group/tray-expander`)
    pub preferred_drawer: String,
    /// Key prefix that marks a group entry
    pub group_prefix: String,
    /// Drawer entry the module is placed right after
    pub tray_sentinel: String,
    /// Placeholder put in front of the module in an otherwise empty drawer
    pub expand_sentinel: String,
    /// Flat list used when no drawer is found
    pub fallback_list: FlatList,
    /// Anchors in preference order; the first one present wins
    pub anchors: Vec<String>,
    pub anchor_side: AnchorSide,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            use_drawer: true,
            preferred_drawer: "group/tray-expander".to_string(),
            group_prefix: "group/".to_string(),
            tray_sentinel: "tray".to_string(),
            expand_sentinel: "custom/expand-icon".to_string(),
            fallback_list: FlatList::Right,
            anchors: ["network", "bluetooth", "pulseaudio", "wireplumber", "cpu", "battery"]
                .into_iter()
                .map(String::from)
                .collect(),
            anchor_side: AnchorSide::Before,
        }
    }
}

impl PlacementPolicy {
    /// Flat placement right after the Omarchy menu button on the left
    pub fn omarchy_left() -> Self {
        Self {
            use_drawer: false,
            fallback_list: FlatList::Left,
            anchors: vec!["custom/omarchy".to_string()],
            anchor_side: AnchorSide::After,
            ..Self::default()
        }
    }
}

/// What `ensure_module_placement` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The module lives in a drawer group's `modules` list
    Drawer {
        group: String,
        inserted: bool,
        sentinel_added: bool,
        /// Other lists the module was removed from
        removed_from: Vec<String>,
    },
    /// The module lives in a flat list (or was already somewhere else)
    Flat {
        list: String,
        inserted: bool,
        /// Other lists the module was removed from
        removed_from: Vec<String>,
    },
}

impl Placement {
    /// Whether the document was changed
    pub fn changed(&self) -> bool {
        match self {
            Placement::Drawer {
                inserted,
                removed_from,
                ..
            }
            | Placement::Flat {
                inserted,
                removed_from,
                ..
            } => *inserted || !removed_from.is_empty(),
        }
    }
}

fn is_module(value: &Value, module_id: &str) -> bool {
    matches!(value, Value::String(s) if s == module_id)
}

fn position(list: &[Value], module_id: &str) -> Option<usize> {
    list.iter().position(|v| is_module(v, module_id))
}

/// The `modules` list of a group entry, if it has the drawer shape
fn group_modules(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Object(group) => match group.get("modules")? {
            Value::Array(modules) => Some(modules),
            _ => None,
        },
        _ => None,
    }
}

fn group_modules_mut(value: &mut Value) -> Option<&mut Vec<Value>> {
    match value {
        Value::Object(group) => match group.get_mut("modules")? {
            Value::Array(modules) => Some(modules),
            _ => None,
        },
        _ => None,
    }
}

/// Find the group whose `modules` list should receive the module
///
/// The preferred drawer wins if it has the right shape; otherwise the first
/// `group/*` entry holding a `modules` array is used. Groups with any other
/// shape are skipped.
pub fn locate_drawer_group(doc: &ConfigDocument, policy: &PlacementPolicy) -> Option<String> {
    if doc
        .get(&policy.preferred_drawer)
        .and_then(group_modules)
        .is_some()
    {
        return Some(policy.preferred_drawer.clone());
    }

    doc.iter()
        .filter(|(key, _)| key.starts_with(&policy.group_prefix))
        .find(|(_, value)| group_modules(value).is_some())
        .map(|(key, _)| key.clone())
}

/// Every list key (flat list or group) that currently contains `module_id`
pub fn find_module(doc: &ConfigDocument, module_id: &str, group_prefix: &str) -> Vec<String> {
    let mut found = Vec::new();

    for key in FLAT_LISTS {
        if let Some(Value::Array(list)) = doc.get(key) {
            if position(list, module_id).is_some() {
                found.push(key.to_string());
            }
        }
    }

    for (key, value) in doc {
        if !key.starts_with(group_prefix) {
            continue;
        }
        if let Some(modules) = group_modules(value) {
            if position(modules, module_id).is_some() {
                found.push(key.clone());
            }
        }
    }

    found
}

/// Remove every occurrence of `module_id` from a list, returning whether any
/// was removed
pub fn remove_module(list: &mut Vec<Value>, module_id: &str) -> bool {
    let before = list.len();
    list.retain(|v| !is_module(v, module_id));
    list.len() != before
}

/// Keep only the first occurrence of `module_id`, returning whether any
/// duplicate was dropped
fn keep_first(list: &mut Vec<Value>, module_id: &str) -> bool {
    let before = list.len();
    let mut seen = false;
    list.retain(|v| {
        if !is_module(v, module_id) {
            return true;
        }
        let first = !seen;
        seen = true;
        first
    });
    list.len() != before
}

/// Drop `module_id` from every flat and group list except `keep`, which
/// retains a single occurrence. Returns the keys of the lists that changed.
///
/// Missing or non-array lists are left untouched.
fn remove_elsewhere(
    doc: &mut ConfigDocument,
    module_id: &str,
    keep: &str,
    group_prefix: &str,
) -> Vec<String> {
    let mut removed_from = Vec::new();

    for (key, value) in doc.iter_mut() {
        let list = if FLAT_LISTS.iter().any(|flat| *flat == key.as_str()) {
            match value {
                Value::Array(list) => list,
                _ => continue,
            }
        } else if key.starts_with(group_prefix) {
            match group_modules_mut(value) {
                Some(modules) => modules,
                None => continue,
            }
        } else {
            continue;
        };

        let changed = if key == keep {
            keep_first(list, module_id)
        } else {
            remove_module(list, module_id)
        };
        if changed {
            removed_from.push(key.clone());
        }
    }

    removed_from
}

/// Insert into a drawer list; returns (inserted, sentinel_added)
fn insert_into_drawer(
    modules: &mut Vec<Value>,
    module_id: &str,
    policy: &PlacementPolicy,
) -> (bool, bool) {
    if position(modules, module_id).is_some() {
        return (false, false);
    }

    if let Some(tray) = position(modules, &policy.tray_sentinel) {
        modules.insert(tray + 1, Value::String(module_id.to_string()));
        return (true, false);
    }

    modules.push(Value::String(module_id.to_string()));
    if modules.len() == 1 {
        // Keep the drawer's expand icon as the visible first element
        modules.insert(0, Value::String(policy.expand_sentinel.clone()));
        return (true, true);
    }
    (true, false)
}

/// Make `module_id` appear in exactly one module list
///
/// With a drawer group present the module goes into the drawer (after the
/// tray sentinel, or at the end) and is removed from every other list.
/// Otherwise it is inserted into the policy's flat list next to the first
/// anchor present, or appended. Running this twice leaves the document as
/// the first run did.
pub fn ensure_module_placement(
    doc: &mut ConfigDocument,
    module_id: &str,
    policy: &PlacementPolicy,
) -> Result<Placement, ShapeError> {
    let drawer = if policy.use_drawer {
        locate_drawer_group(doc, policy)
    } else {
        None
    };

    match drawer {
        Some(group) => place_in_drawer(doc, module_id, policy, group),
        None => place_in_flat_list(doc, module_id, policy),
    }
}

fn place_in_drawer(
    doc: &mut ConfigDocument,
    module_id: &str,
    policy: &PlacementPolicy,
    group: String,
) -> Result<Placement, ShapeError> {
    let modules = doc
        .get_mut(&group)
        .and_then(group_modules_mut)
        .ok_or_else(|| ShapeError::NotAnArray {
            key: format!("{group}.modules"),
            found: "missing",
        })?;
    let (inserted, sentinel_added) = insert_into_drawer(modules, module_id, policy);
    let removed_from = remove_elsewhere(doc, module_id, &group, &policy.group_prefix);

    Ok(Placement::Drawer {
        group,
        inserted,
        sentinel_added,
        removed_from,
    })
}

fn place_in_flat_list(
    doc: &mut ConfigDocument,
    module_id: &str,
    policy: &PlacementPolicy,
) -> Result<Placement, ShapeError> {
    // Already placed somewhere: keep the first location, drop the rest
    if let Some(existing) = find_module(doc, module_id, &policy.group_prefix)
        .into_iter()
        .next()
    {
        let removed_from = remove_elsewhere(doc, module_id, &existing, &policy.group_prefix);
        return Ok(Placement::Flat {
            list: existing,
            inserted: false,
            removed_from,
        });
    }

    let key = policy.fallback_list.key();
    let list = match doc
        .entry(key)
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(list) => list,
        other => {
            return Err(ShapeError::NotAnArray {
                key: key.to_string(),
                found: kind_of(other),
            })
        }
    };

    let anchor = policy
        .anchors
        .iter()
        .find_map(|anchor| position(list, anchor));
    let index = match (anchor, policy.anchor_side) {
        (Some(i), AnchorSide::Before) => i,
        (Some(i), AnchorSide::After) => i + 1,
        (None, _) => list.len(),
    };
    list.insert(index, Value::String(module_id.to_string()));

    Ok(Placement::Flat {
        list: key.to_string(),
        inserted: true,
        removed_from: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WIZADO: &str = "custom/wizado";

    fn doc(value: Value) -> ConfigDocument {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_locate_prefers_tray_expander() {
        let d = doc(json!({
            "group/power": {"modules": ["battery"]},
            "group/tray-expander": {"modules": ["tray"]}
        }));
        assert_eq!(
            locate_drawer_group(&d, &PlacementPolicy::default()),
            Some("group/tray-expander".to_string())
        );
    }

    #[test]
    fn test_locate_falls_back_to_first_group() {
        let d = doc(json!({
            "group/broken": "not a group",
            "group/no-modules": {"orientation": "inherit"},
            "group/bad-modules": {"modules": "tray"},
            "group/power": {"modules": ["battery"]},
            "group/audio": {"modules": []}
        }));
        assert_eq!(
            locate_drawer_group(&d, &PlacementPolicy::default()),
            Some("group/power".to_string())
        );
    }

    #[test]
    fn test_locate_skips_malformed_preferred() {
        let d = doc(json!({
            "group/tray-expander": {"modules": null},
            "group/other": {"modules": []}
        }));
        assert_eq!(
            locate_drawer_group(&d, &PlacementPolicy::default()),
            Some("group/other".to_string())
        );
    }

    #[test]
    fn test_locate_none() {
        let d = doc(json!({
            "modules-right": ["tray"],
            "custom/group/x": {"modules": []}
        }));
        assert_eq!(locate_drawer_group(&d, &PlacementPolicy::default()), None);
    }

    #[test]
    fn test_drawer_after_tray() {
        let mut d = doc(json!({
            "modules-right": ["group/tray-expander", "custom/wizado", "clock"],
            "modules-left": ["custom/wizado"],
            "group/tray-expander": {"modules": ["tray", "network"]}
        }));

        let placement = ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert_eq!(
            d["group/tray-expander"]["modules"],
            json!(["tray", "custom/wizado", "network"])
        );
        assert_eq!(d["modules-right"], json!(["group/tray-expander", "clock"]));
        assert_eq!(d["modules-left"], json!([]));
        assert_eq!(
            placement,
            Placement::Drawer {
                group: "group/tray-expander".to_string(),
                inserted: true,
                sentinel_added: false,
                removed_from: vec!["modules-right".to_string(), "modules-left".to_string()],
            }
        );
    }

    #[test]
    fn test_drawer_empty_gets_expand_icon() {
        let mut d = doc(json!({"group/tray-expander": {"modules": []}}));

        let placement = ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert_eq!(
            d["group/tray-expander"]["modules"],
            json!(["custom/expand-icon", "custom/wizado"])
        );
        assert!(matches!(
            placement,
            Placement::Drawer {
                sentinel_added: true,
                ..
            }
        ));
    }

    #[test]
    fn test_drawer_append_without_tray() {
        let mut d = doc(json!({"group/extras": {"modules": ["custom/expand-icon", "cpu"]}}));

        ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert_eq!(
            d["group/extras"]["modules"],
            json!(["custom/expand-icon", "cpu", "custom/wizado"])
        );
    }

    #[test]
    fn test_drawer_does_not_create_flat_lists() {
        let mut d = doc(json!({
            "modules-center": "clock",
            "group/tray-expander": {"modules": ["tray"]}
        }));

        ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert!(!d.contains_key("modules-left"));
        assert!(!d.contains_key("modules-right"));
        assert_eq!(d["modules-center"], json!("clock"));
    }

    #[test]
    fn test_drawer_removes_from_other_groups() {
        let mut d = doc(json!({
            "group/tray-expander": {"modules": ["tray"]},
            "group/power": {"modules": ["custom/wizado", "battery"]}
        }));

        ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert_eq!(d["group/power"]["modules"], json!(["battery"]));
        assert_eq!(
            find_module(&d, WIZADO, "group/"),
            vec!["group/tray-expander".to_string()]
        );
    }

    #[test]
    fn test_flat_before_first_anchor() {
        let mut d = doc(json!({
            "modules-right": ["tray", "cpu", "bluetooth", "clock"]
        }));

        let placement = ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        // bluetooth ranks above cpu in the anchor set
        assert_eq!(
            d["modules-right"],
            json!(["tray", "cpu", "custom/wizado", "bluetooth", "clock"])
        );
        assert_eq!(
            placement,
            Placement::Flat {
                list: "modules-right".to_string(),
                inserted: true,
                removed_from: vec![],
            }
        );
    }

    #[test]
    fn test_flat_appends_without_anchor() {
        let mut d = doc(json!({"modules-right": ["tray", "clock"]}));

        ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert_eq!(d["modules-right"], json!(["tray", "clock", "custom/wizado"]));
    }

    #[test]
    fn test_flat_creates_missing_list() {
        let mut d = doc(json!({"layer": "top"}));

        ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert_eq!(d["modules-right"], json!(["custom/wizado"]));
    }

    #[test]
    fn test_flat_rejects_non_array_list() {
        let mut d = doc(json!({"modules-right": {"tray": true}}));

        let err = ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap_err();

        assert_eq!(
            err,
            ShapeError::NotAnArray {
                key: "modules-right".to_string(),
                found: "object",
            }
        );
    }

    #[test]
    fn test_flat_leaves_existing_placement() {
        let mut d = doc(json!({
            "modules-left": ["custom/wizado"],
            "modules-right": ["network"]
        }));

        let placement = ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert!(!placement.changed());
        assert_eq!(d["modules-left"], json!(["custom/wizado"]));
        assert_eq!(d["modules-right"], json!(["network"]));
    }

    #[test]
    fn test_flat_collapses_duplicates() {
        let mut d = doc(json!({
            "modules-left": ["custom/wizado"],
            "modules-right": ["network", "custom/wizado"],
            "group/power": {"modules": ["custom/wizado", "battery"]}
        }));
        let policy = PlacementPolicy {
            use_drawer: false,
            ..PlacementPolicy::default()
        };

        let placement = ensure_module_placement(&mut d, WIZADO, &policy).unwrap();

        assert_eq!(
            placement,
            Placement::Flat {
                list: "modules-left".to_string(),
                inserted: false,
                removed_from: vec!["modules-right".to_string(), "group/power".to_string()],
            }
        );
        assert!(placement.changed());
        assert_eq!(find_module(&d, WIZADO, "group/"), vec!["modules-left".to_string()]);
        assert_eq!(d["modules-right"], json!(["network"]));
        assert_eq!(d["group/power"]["modules"], json!(["battery"]));
    }

    #[test]
    fn test_flat_duplicates_across_lists_default_policy() {
        let mut d = doc(json!({
            "modules-left": ["custom/wizado"],
            "modules-right": ["network", "custom/wizado"]
        }));

        ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert_eq!(find_module(&d, WIZADO, "group/").len(), 1);
        assert_eq!(d["modules-left"], json!(["custom/wizado"]));
        assert_eq!(d["modules-right"], json!(["network"]));
    }

    #[test]
    fn test_duplicate_within_one_list() {
        let mut d = doc(json!({
            "modules-right": ["custom/wizado", "clock", "custom/wizado"]
        }));

        let placement = ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::default()).unwrap();

        assert!(placement.changed());
        assert_eq!(d["modules-right"], json!(["custom/wizado", "clock"]));
    }

    #[test]
    fn test_omarchy_left_policy() {
        let mut d = doc(json!({
            "modules-left": ["custom/omarchy", "hyprland/workspaces"],
            "group/tray-expander": {"modules": ["tray"]}
        }));

        ensure_module_placement(&mut d, WIZADO, &PlacementPolicy::omarchy_left()).unwrap();

        assert_eq!(
            d["modules-left"],
            json!(["custom/omarchy", "custom/wizado", "hyprland/workspaces"])
        );
        assert_eq!(d["group/tray-expander"]["modules"], json!(["tray"]));
    }

    #[test]
    fn test_idempotent() {
        let fixtures = [
            json!({"group/tray-expander": {"modules": []}}),
            json!({"group/tray-expander": {"modules": ["tray", "network"]}, "modules-right": ["custom/wizado"]}),
            json!({"modules-right": ["tray", "network"]}),
            json!({}),
        ];

        for fixture in fixtures {
            let mut once = doc(fixture);
            ensure_module_placement(&mut once, WIZADO, &PlacementPolicy::default()).unwrap();

            let mut twice = once.clone();
            let second = ensure_module_placement(&mut twice, WIZADO, &PlacementPolicy::default()).unwrap();

            assert_eq!(once, twice);
            assert!(!second.changed());
        }
    }

    #[test]
    fn test_remove_module() {
        let mut list = vec![json!("a"), json!("custom/wizado"), json!(3), json!("custom/wizado")];
        assert!(remove_module(&mut list, WIZADO));
        assert_eq!(list, vec![json!("a"), json!(3)]);
        assert!(!remove_module(&mut list, WIZADO));
    }
}
