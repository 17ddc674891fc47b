//! Waybar config patching

pub mod definition;
pub mod error;
pub mod jsonc;
pub mod placement;

// Re-exports for library consumers
pub use definition::{upsert_module_definition, WizadoModule, MODULE_ID};
pub use error::ShapeError;
pub use jsonc::ConfigDocument;
pub use placement::{ensure_module_placement, locate_drawer_group, Placement, PlacementPolicy};
