//! End-to-end fetch orchestration

use std::path::Path;

use tracing::debug;

use crate::driver::{self, DriverSettings, UsageDriver};
use crate::parse;
use crate::result::FetchError;
use crate::snapshot::UsageSnapshot;

/// Run the driver chain, parse the capture, and persist the snapshot.
///
/// The two designed failure exits leave the filesystem untouched: driver
/// exhaustion returns [`FetchError::NoOutput`] and an unparseable capture
/// returns [`FetchError::NoPercentage`] before any write happens.
pub async fn fetch_and_save(
    drivers: &[Box<dyn UsageDriver>],
    settings: &DriverSettings,
    path: &Path,
) -> Result<UsageSnapshot, FetchError> {
    let raw = driver::capture_output(drivers, settings)
        .await
        .ok_or(FetchError::NoOutput)?;
    debug!(bytes = raw.len(), "parsing captured output");

    let percentage = parse::extract_percentage(&raw).ok_or(FetchError::NoPercentage)?;

    let snapshot = UsageSnapshot::new(percentage);
    snapshot.save_to(path)?;
    Ok(snapshot)
}
