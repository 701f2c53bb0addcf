use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory where the persisted collections live
    pub data_dir: PathBuf,

    /// Quiet period after the last edit before an autosave commit, in milliseconds
    pub autosave_quiet_ms: u64,

    /// How long the saved indicator is shown before reverting to idle, in milliseconds
    pub saved_hold_ms: u64,

    /// Whether the hosting viewport is too narrow for a side-by-side preview
    pub narrow_viewport: bool,
}

impl Config {
    pub fn autosave_quiet(&self) -> Duration {
        Duration::from_millis(self.autosave_quiet_ms)
    }

    pub fn saved_hold(&self) -> Duration {
        Duration::from_millis(self.saved_hold_ms)
    }

    fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("marknotes")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            autosave_quiet_ms: 1000,
            saved_hold_ms: 2000,
            narrow_viewport: false,
        }
    }
}
