// Tracker policy - the fixed amounts and labels the statistics depend on

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Monthly tuition expected from every student, in rupiah.
pub const DEFAULT_MONTHLY_FEE: u64 = 150_000;

/// Month the "current month" statistics are computed against.
pub const DEFAULT_REFERENCE_MONTH: &str = "Januari";

pub const DEFAULT_CLASS: &str = "9A";

/// Name shown on screen for a transaction whose student was deleted.
pub const UNKNOWN_STUDENT: &str = "Unknown";

/// Name written to CSV reports for a transaction whose student was deleted.
pub const DELETED_STUDENT: &str = "Siswa Dihapus";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub monthly_fee: u64,
    pub reference_month: String,
    pub default_class: String,
    pub unknown_student: String,
    pub deleted_student: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            monthly_fee: DEFAULT_MONTHLY_FEE,
            reference_month: DEFAULT_REFERENCE_MONTH.to_string(),
            default_class: DEFAULT_CLASS.to_string(),
            unknown_student: UNKNOWN_STUDENT.to_string(),
            deleted_student: DELETED_STUDENT.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Load config from a JSON file; absent keys keep their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: TrackerConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }
}
