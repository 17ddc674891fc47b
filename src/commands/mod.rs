//! CLI commands

pub mod patch;
pub mod show;
pub mod terminal;
