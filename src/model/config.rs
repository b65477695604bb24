use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the JSON key-value store holding views.
    /// Default: `$XDG_CONFIG_HOME/tasktable/state.json`
    #[serde(default)]
    pub state_file: Option<PathBuf>,
    /// Optional JSON task forest. The built-in sample is used when absent.
    #[serde(default)]
    pub tasks_file: Option<PathBuf>,
    #[serde(default)]
    pub columns: ColumnSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSettings {
    /// Minimum width for columns without their own `minWidth`
    #[serde(default = "default_min_width")]
    pub default_min_width: u32,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        ColumnSettings {
            default_min_width: default_min_width(),
        }
    }
}

fn default_min_width() -> u32 {
    60
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiSettings {
    /// Hex color overrides keyed by palette slot, e.g. `green = "#44FF88"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
