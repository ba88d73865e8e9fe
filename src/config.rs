use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::Theme;

/// Optional startup configuration, read from `dashboard.json` next to the
/// executable's working directory. Missing file means defaults; the file is
/// never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset to load on startup. `None` waits for File → Open…
    pub data_path: Option<PathBuf>,
    pub theme: Theme,
    /// Row cap for the filtered-data table widget.
    pub table_preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            theme: Theme::Light,
            table_preview_rows: 500,
        }
    }
}

pub const CONFIG_FILE: &str = "dashboard.json";

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load the default config file, falling back to defaults when absent
    /// or unreadable.
    pub fn load_or_default() -> Self {
        match Self::load(Path::new(CONFIG_FILE)) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("no usable {CONFIG_FILE} ({e:#}); using defaults");
                Self::default()
            }
        }
    }
}
