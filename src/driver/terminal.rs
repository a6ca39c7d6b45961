//! Terminal.app automation driver (macOS)

use super::{DriverSettings, UsageDriver};
use anyhow::Context;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

/// Scripts Terminal.app through `osascript`: open a tab, run the program,
/// send the usage command, read the visible tab contents, then close the tab.
///
/// Last resort on macOS. Needs automation permission granted to the calling
/// process; a denial surfaces as an `osascript` error and the driver reports
/// failure like any other.
pub struct TerminalScriptDriver;

fn automation_script(settings: &DriverSettings) -> String {
    format!(
        r#"tell application "Terminal"
    set newTab to do script "{command}"
    delay 2
    do script "{usage}" in newTab
    delay 2
    set output to contents of newTab
    do script "{exit}" in newTab
    delay 1
    close newTab
    return output
end tell"#,
        command = settings.command,
        usage = settings.usage_command,
        exit = settings.exit_command,
    )
}

#[async_trait]
impl UsageDriver for TerminalScriptDriver {
    fn name(&self) -> &'static str {
        "terminal-script"
    }

    fn available(&self) -> bool {
        cfg!(target_os = "macos")
    }

    async fn fetch(&self, settings: &DriverSettings) -> Option<String> {
        match try_fetch(settings).await {
            Ok(output) => Some(output),
            Err(error) => {
                warn!(error = %format!("{error:#}"), "terminal automation failed");
                None
            }
        }
    }
}

async fn try_fetch(settings: &DriverSettings) -> anyhow::Result<String> {
    let script = automation_script(settings);
    let mut command = Command::new("osascript");
    command
        .arg("-e")
        .arg(&script)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let output = timeout(settings.overall_timeout, command.output())
        .await
        .context("osascript did not finish in time")?
        .context("failed to run osascript")?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_embeds_commands() {
        let settings = DriverSettings::default();
        let script = automation_script(&settings);
        assert!(script.contains(r#"do script "claude""#));
        assert!(script.contains(r#"do script "/usage" in newTab"#));
        assert!(script.contains(r#"do script "exit" in newTab"#));
        assert!(script.contains("close newTab"));
    }

    #[test]
    fn test_script_respects_overrides() {
        let settings = DriverSettings {
            command: "claude-next".to_string(),
            ..DriverSettings::default()
        };
        let script = automation_script(&settings);
        assert!(script.contains(r#"do script "claude-next""#));
    }
}
