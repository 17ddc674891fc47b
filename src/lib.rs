//! wizado-waybar library
//!
//! Adds the wizado status module to a Waybar config: finds the right module
//! list (a tray drawer group if there is one), writes the module definition,
//! and works out which terminal the click action should open.

pub mod config;
pub mod terminal;
pub mod waybar;
