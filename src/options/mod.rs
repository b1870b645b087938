//! Engine options with TOML preset support.
//!
//! Timing and layout settings are consolidated here. Options serialize
//! to/from TOML so presets can be kept next to command scripts.

mod animation;
mod layout;

use std::path::Path;

pub use animation::AnimationOptions;
pub use layout::LayoutOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::StructvizError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[animation]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Phase timing and immediate-mode switch.
    pub animation: AnimationOptions,
    /// Canvas geometry used by the layout engine.
    pub layout: LayoutOptions,
}

impl Options {
    /// Options with animation disabled (immediate mode).
    #[must_use]
    pub fn immediate() -> Self {
        let mut options = Self::default();
        options.animation.enabled = false;
        options
    }

    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, StructvizError> {
        let content =
            std::fs::read_to_string(path).map_err(StructvizError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, StructvizError> {
        toml::from_str(content)
            .map_err(|e| StructvizError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), StructvizError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StructvizError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StructvizError::Io)?;
        }
        std::fs::write(path, content).map_err(StructvizError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
