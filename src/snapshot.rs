//! Usage snapshot construction and persistence

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::result::FetchError;

/// Subscription label advertised in the snapshot.
pub const SUBSCRIPTION: &str = "Claude Pro";

/// Usage window the percentage refers to.
pub const WINDOW: &str = "5-hour";

/// Provenance label for downstream consumers.
pub const SOURCE: &str = "auto-fetch from Claude Code";

/// Directory under the home directory that the pet UI watches.
const DATA_DIR: &str = ".openclaw-pet";

/// Snapshot file name inside the data directory.
const DATA_FILE: &str = "real-usage.json";

/// How far ahead the usage window resets, in hours.
const RESET_WINDOW_HOURS: i64 = 5;

/// The persisted usage record, serialized as camelCase JSON.
///
/// Constructed fresh each run and written as a full overwrite: at most one
/// snapshot exists at the fixed path, with no merge and no history. The pet
/// UI tolerates the file being absent, stale, or carrying any integer, so no
/// locking is needed and the value is not range-checked here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    /// Usage percentage scraped from the assistant.
    pub percentage: u32,

    /// Mirror of `percentage`, kept for the consumer's schema.
    pub used: u32,

    /// Fixed denominator.
    pub limit: u32,

    /// When the current usage window resets.
    pub reset_at: DateTime<Local>,

    /// Subscription label.
    pub subscription: String,

    /// Usage window type.
    #[serde(rename = "type")]
    pub window: String,

    /// Marks the value as scraped rather than simulated.
    pub real_data: bool,

    /// When this snapshot was generated.
    pub timestamp: DateTime<Local>,

    /// Where the value came from.
    pub source: String,
}

impl UsageSnapshot {
    /// Build a fresh snapshot for `percentage`, stamped now.
    pub fn new(percentage: u32) -> Self {
        let now = Local::now();
        Self {
            percentage,
            used: percentage,
            limit: 100,
            reset_at: now + Duration::hours(RESET_WINDOW_HOURS),
            subscription: SUBSCRIPTION.to_string(),
            window: WINDOW.to_string(),
            real_data: true,
            timestamp: now,
            source: SOURCE.to_string(),
        }
    }

    /// Write the snapshot to `path` as pretty-printed JSON.
    ///
    /// Parent directories are created as needed (silently fine if they
    /// already exist) and any existing file is fully replaced.
    pub fn save_to(&self, path: &Path) -> Result<(), FetchError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), percentage = self.percentage, "snapshot written");
        Ok(())
    }
}

/// The fixed snapshot location the pet UI reads from.
pub fn default_path() -> Result<PathBuf, FetchError> {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR).join(DATA_FILE))
        .ok_or(FetchError::NoHomeDir)
}
