//! Pipe-based fallback driver

use super::{DriverSettings, UsageDriver};
use anyhow::Context;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

/// Feeds the usage and exit commands through plain stdio pipes.
///
/// No PTY involved: the program is spawned with redirected streams, both
/// commands are written up front, stdin is closed, and combined output is
/// collected under the overall timeout. Builds of the assistant that demand
/// a TTY exit immediately here, which simply falls through to the next
/// strategy.
pub struct PipeDriver;

#[async_trait]
impl UsageDriver for PipeDriver {
    fn name(&self) -> &'static str {
        "pipe"
    }

    async fn fetch(&self, settings: &DriverSettings) -> Option<String> {
        match try_fetch(settings).await {
            Ok(output) => Some(output),
            Err(error) => {
                warn!(error = %format!("{error:#}"), "pipe capture failed");
                None
            }
        }
    }
}

async fn try_fetch(settings: &DriverSettings) -> anyhow::Result<String> {
    let mut parts = settings.command.split_whitespace();
    let program = parts.next().context("empty command")?;

    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn `{}`", settings.command))?;

    if let Some(mut stdin) = child.stdin.take() {
        let script = format!("{}\n{}\n", settings.usage_command, settings.exit_command);
        stdin
            .write_all(script.as_bytes())
            .await
            .context("failed to write commands to stdin")?;
        stdin.shutdown().await.context("failed to close stdin")?;
    }

    // kill_on_drop reaps the child when the timeout abandons this future.
    let output = timeout(settings.overall_timeout, child.wait_with_output())
        .await
        .context("process did not finish in time")?
        .context("failed to collect output")?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(text)
}
