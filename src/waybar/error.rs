//! Errors for unexpected document shapes

use thiserror::Error;

/// A value in the Waybar config did not have the shape the patcher needs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// The document root is not a JSON object
    #[error("config root is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },

    /// A module list key holds something other than an array
    #[error("\"{key}\" is not an array (found {found})")]
    NotAnArray { key: String, found: &'static str },
}

/// Human-readable name of a JSON value's kind
pub fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
