//! Per-field redaction configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Backend field names arrive numbered, "3. Social Security". The ordinal is
/// a transport artifact; it is stripped for display and for submission
/// payloads alike, never stored back.
static ORDINAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s").expect("Invalid regex"));

/// Strip the leading `<digits>. ` ordinal a backend field name may carry.
pub fn display_name(field: &str) -> String {
    ORDINAL_PREFIX.replace(field, "").into_owned()
}

/// Redaction treatment for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionMode {
    None,
    Mask,
    Obfuscate,
}

impl RedactionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedactionMode::None => "none",
            RedactionMode::Mask => "mask",
            RedactionMode::Obfuscate => "obfuscate",
        }
    }
}

/// User-editable configuration for one (file, field) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldControl {
    pub visible: bool,
    pub mode: RedactionMode,
    pub prompt: String,
}

impl Default for FieldControl {
    fn default() -> Self {
        Self {
            visible: true,
            mode: RedactionMode::None,
            prompt: String::new(),
        }
    }
}

impl FieldControl {
    /// Default control for a detected image entity: masked out of the box.
    pub fn masked() -> Self {
        Self {
            mode: RedactionMode::Mask,
            ..Self::default()
        }
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    /// Radio semantics: the new mode replaces whatever was set before, so a
    /// field never carries two treatments at once.
    pub fn set_mode(&mut self, mode: RedactionMode) {
        self.mode = mode;
    }

    /// Mode as submitted to the backend, where "no treatment" is null rather
    /// than the string `none`.
    pub fn wire_mode(&self) -> Option<RedactionMode> {
        match self.mode {
            RedactionMode::None => None,
            other => Some(other),
        }
    }
}
