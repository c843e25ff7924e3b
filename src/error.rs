//! GapError - error kinds for the gap-annotation core
//!
//! Two failure classes exist:
//! - `Configuration`: malformed delimiter setup. Fatal to a scan; no partial
//!   scan is performed.
//! - `Parse`: malformed persisted settings blob. Recoverable; callers fall
//!   back to an empty store so the editing session continues.
//!
//! A lookup miss in the settings store is not an error (it is the normal
//! insert-vs-update signal) and is modeled as `Option`, not a variant here.

use wasm_bindgen::JsValue;

/// Errors produced by the gap scanner and settings store
#[derive(Debug, Clone, PartialEq)]
pub enum GapError {
    /// Missing or invalid delimiter configuration
    Configuration(String),
    /// Malformed persisted settings data
    Parse(String),
}

impl std::fmt::Display for GapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GapError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            GapError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for GapError {}

impl From<GapError> for JsValue {
    fn from(err: GapError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let e = GapError::Configuration("left delimiter is empty".to_string());
        assert_eq!(e.to_string(), "Configuration error: left delimiter is empty");

        let e = GapError::Parse("unexpected token".to_string());
        assert_eq!(e.to_string(), "Parse error: unexpected token");
    }
}
