//! Fallback chain of capture strategies
//!
//! Every way of coaxing usage text out of the assistant hides behind one
//! trait: attempt a capture, return the text or `None`, never raise. The
//! chain runs the strategies in a fixed order and stops at the first
//! non-empty capture, which keeps the platform-specific Terminal automation
//! behind the same interface as the portable drivers.

mod interactive;
mod pipe;
mod terminal;

pub use interactive::InteractiveDriver;
pub use pipe::PipeDriver;
pub use terminal::TerminalScriptDriver;

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// Settings shared by every driver attempt.
#[derive(Debug, Clone)]
pub struct DriverSettings {
    /// Program to drive, resolved on PATH.
    pub command: String,

    /// Slash command that makes the program print its usage.
    pub usage_command: String,

    /// Command that ends the interactive session.
    pub exit_command: String,

    /// How long to wait for the interactive prompt.
    pub prompt_timeout: Duration,

    /// How long to wait for usage output after the query is sent.
    pub response_timeout: Duration,

    /// Cap on a whole non-interactive attempt.
    pub overall_timeout: Duration,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            usage_command: "/usage".to_string(),
            exit_command: "exit".to_string(),
            prompt_timeout: Duration::from_secs(10),
            response_timeout: Duration::from_secs(5),
            overall_timeout: Duration::from_secs(10),
        }
    }
}

/// A strategy for obtaining raw usage text from the target program.
///
/// Implementations never fail loudly: every internal error is logged and
/// collapsed into `None` so the chain can move on to the next strategy.
#[async_trait]
pub trait UsageDriver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this driver can run on the current platform.
    fn available(&self) -> bool {
        true
    }

    /// Attempt to capture raw output. `None` means this strategy failed.
    async fn fetch(&self, settings: &DriverSettings) -> Option<String>;
}

/// The built-in strategies in fallback order.
pub fn default_chain() -> Vec<Box<dyn UsageDriver>> {
    vec![
        Box::new(InteractiveDriver),
        Box::new(PipeDriver),
        Box::new(TerminalScriptDriver),
    ]
}

/// Run the chain in order and return the first non-empty capture.
pub async fn capture_output(
    drivers: &[Box<dyn UsageDriver>],
    settings: &DriverSettings,
) -> Option<String> {
    for driver in drivers {
        if !driver.available() {
            continue;
        }
        info!(driver = driver.name(), "attempting capture");
        match driver.fetch(settings).await {
            Some(output) if !output.trim().is_empty() => {
                info!(
                    driver = driver.name(),
                    bytes = output.len(),
                    "captured output"
                );
                return Some(output);
            }
            Some(_) => warn!(driver = driver.name(), "driver returned empty output"),
            None => warn!(driver = driver.name(), "driver failed"),
        }
    }
    None
}
