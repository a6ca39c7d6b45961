//! PTY-backed interactive session driver

use super::{DriverSettings, UsageDriver};
use crate::pattern::Pattern;
use crate::result::SessionError;
use crate::session::Session;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Drives the program under a PTY the way a human would: wait for the
/// prompt, type the usage command, read the reply.
///
/// This is the first strategy in the chain and the one that works against
/// current builds of the assistant, which insist on a real terminal.
pub struct InteractiveDriver;

/// Prompt pattern order mirrors what the assistant actually prints; the bare
/// ">" goes last because it matches almost anything.
fn prompt_patterns() -> Result<Vec<Pattern>, SessionError> {
    Ok(vec![
        Pattern::regex(r"desktop_bot.*>")?,
        Pattern::exact("How can I help"),
        Pattern::exact("claude>"),
        Pattern::exact(">"),
        Pattern::Eof,
        Pattern::Timeout,
    ])
}

#[async_trait]
impl UsageDriver for InteractiveDriver {
    fn name(&self) -> &'static str {
        "interactive-session"
    }

    async fn fetch(&self, settings: &DriverSettings) -> Option<String> {
        match try_fetch(settings).await {
            Ok(output) => output,
            Err(error) => {
                warn!(%error, "interactive session failed");
                None
            }
        }
    }
}

async fn try_fetch(settings: &DriverSettings) -> Result<Option<String>, SessionError> {
    let mut session = Session::builder()
        .timeout(settings.prompt_timeout)
        .spawn(&settings.command)?;

    let result = drive(&mut session, settings).await;

    // Wind the session down whether the exchange worked or not; an orphaned
    // assistant would hold the usage slot this tool is trying to measure.
    let _ = session.send_line(&settings.exit_command).await;
    session.close().await;

    result
}

async fn drive(
    session: &mut Session,
    settings: &DriverSettings,
) -> Result<Option<String>, SessionError> {
    let patterns = prompt_patterns()?;
    let prompt = session.expect_any(&patterns).await?;
    if matches!(
        patterns[prompt.pattern_index],
        Pattern::Eof | Pattern::Timeout
    ) {
        debug!("no prompt appeared");
        return Ok(None);
    }

    session.send_line(&settings.usage_command).await?;

    // A reply that never arrives is not fatal: whatever has been buffered by
    // the deadline may still contain the number we are after.
    let reply = session
        .expect_any_within(
            &[Pattern::exact("%"), Pattern::Timeout],
            Some(settings.response_timeout),
        )
        .await?;

    Ok(Some(reply.full_text()))
}
