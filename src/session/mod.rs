//! PTY session driving for interactive programs

mod builder;

pub use builder::SessionBuilder;

use crate::buffer::CaptureBuffer;
use crate::pattern::Pattern;
use crate::result::{MatchOutcome, SessionError};
use portable_pty::{Child, MasterPty};
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// An interactive program attached to a PTY.
///
/// The session captures everything the program prints, lets the caller wait
/// for patterns in that output, and sends keystrokes back. Output is
/// ANSI-stripped and decoded permissively before matching, so assistants that
/// paint a TUI can still be scraped as plain text.
///
/// # Examples
///
/// ```no_run
/// use clawfetch::{Pattern, Session};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), clawfetch::SessionError> {
/// let mut session = Session::builder()
///     .timeout(Duration::from_secs(10))
///     .spawn("claude")?;
///
/// session.expect_any(&[Pattern::exact(">"), Pattern::Eof, Pattern::Timeout]).await?;
/// session.send_line("/usage").await?;
/// let reply = session
///     .expect_any_within(&[Pattern::exact("%"), Pattern::Timeout], Some(Duration::from_secs(5)))
///     .await?;
/// println!("{}", reply.full_text());
/// session.close().await;
/// # Ok(())
/// # }
/// ```
pub struct Session {
    _master: Box<dyn MasterPty + Send>,
    child: Option<Box<dyn Child + Send>>,
    master_reader: Arc<Mutex<Box<dyn Read + Send>>>,
    master_writer: Arc<Mutex<Box<dyn Write + Send>>>,
    buffer: CaptureBuffer,
    timeout: Option<Duration>,
    eof_reached: bool,
}

impl Session {
    /// Create a new session builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Spawn a command with default configuration (convenience method).
    pub fn spawn(command: &str) -> Result<Self, SessionError> {
        SessionBuilder::new().spawn(command)
    }

    /// Wait for any of the given patterns using the configured timeout.
    ///
    /// First match wins; the returned [`MatchOutcome`] carries the index of
    /// the winning pattern. Include [`Pattern::Eof`] or [`Pattern::Timeout`]
    /// in the list to receive those conditions as matches (with the buffered
    /// transcript in `before`) instead of errors.
    pub async fn expect_any(&mut self, patterns: &[Pattern]) -> Result<MatchOutcome, SessionError> {
        let timeout = self.timeout;
        self.expect_any_within(patterns, timeout).await
    }

    /// Wait for any of the given patterns with an explicit deadline.
    ///
    /// `None` waits indefinitely. Matching considers only output that
    /// arrived after the previous match, so successive waits walk forward
    /// through the transcript.
    pub async fn expect_any_within(
        &mut self,
        patterns: &[Pattern],
        timeout: Option<Duration>,
    ) -> Result<MatchOutcome, SessionError> {
        let eof_index = patterns.iter().position(|p| matches!(p, Pattern::Eof));
        let timeout_index = patterns.iter().position(|p| matches!(p, Pattern::Timeout));
        let started = Instant::now();
        let mut read_buf = vec![0u8; 4096];

        loop {
            for (index, pattern) in patterns.iter().enumerate() {
                if let Some(hit) = pattern.find_in(self.buffer.pending()) {
                    let start = self.buffer.consumed() + hit.start;
                    let end = self.buffer.consumed() + hit.end;
                    let matched = self.buffer.text()[start..end].to_owned();
                    let before = self.buffer.text()[..start].to_owned();
                    self.buffer.consume_to(end);
                    return Ok(MatchOutcome {
                        pattern_index: index,
                        matched,
                        before,
                    });
                }
            }

            if self.eof_reached {
                return match eof_index {
                    Some(index) => Ok(self.drained_outcome(index)),
                    None => Err(SessionError::Eof),
                };
            }

            if let Some(limit) = timeout {
                if started.elapsed() >= limit {
                    return match timeout_index {
                        Some(index) => Ok(self.drained_outcome(index)),
                        None => Err(SessionError::Timeout { duration: limit }),
                    };
                }
            }

            let remaining = timeout.map(|limit| limit.saturating_sub(started.elapsed()));
            match self.read_chunk(&mut read_buf, remaining).await {
                Ok(0) => self.eof_reached = true,
                Ok(n) => self.buffer.push_bytes(&read_buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    // Deadline hit mid-read; the elapsed check settles it on
                    // the next pass.
                }
                Err(e) => {
                    // A PTY master read fails with EIO once the child is
                    // gone; treat that as end of stream.
                    if matches!(self.is_alive(), Ok(true)) {
                        return Err(SessionError::Io(e));
                    }
                    self.eof_reached = true;
                }
            }
        }
    }

    /// Outcome for the special Eof/Timeout members: nothing matched, the
    /// whole transcript rides along in `before`.
    fn drained_outcome(&self, pattern_index: usize) -> MatchOutcome {
        MatchOutcome {
            pattern_index,
            matched: String::new(),
            before: self.buffer.text().to_owned(),
        }
    }

    /// Read with an optional deadline, off the async threads.
    async fn read_chunk(
        &mut self,
        buf: &mut [u8],
        timeout: Option<Duration>,
    ) -> std::io::Result<usize> {
        let reader = Arc::clone(&self.master_reader);
        let len = buf.len();

        let read = tokio::task::spawn_blocking(move || {
            let mut reader = reader.blocking_lock();
            let mut chunk = vec![0u8; len];
            reader.read(&mut chunk).map(|n| (n, chunk))
        });

        let joined = match timeout {
            Some(limit) => tokio::time::timeout(limit, read).await.map_err(|_| {
                std::io::Error::new(std::io::ErrorKind::TimedOut, "read deadline passed")
            })?,
            None => read.await,
        };

        let (n, chunk) = joined.map_err(std::io::Error::other)??;
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }

    /// Send raw bytes to the process and flush.
    pub async fn send(&mut self, data: &[u8]) -> Result<(), SessionError> {
        let writer = Arc::clone(&self.master_writer);
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut writer = writer.blocking_lock();
            writer.write_all(&data)?;
            writer.flush()
        })
        .await
        .map_err(|e| SessionError::Io(std::io::Error::other(e)))??;

        Ok(())
    }

    /// Send a line to the process (appends a newline).
    pub async fn send_line(&mut self, line: &str) -> Result<(), SessionError> {
        self.send(line.as_bytes()).await?;
        self.send(b"\n").await
    }

    /// Everything captured so far, ANSI-stripped and lossily decoded.
    pub fn transcript(&self) -> &str {
        self.buffer.text()
    }

    /// Whether the process is still running.
    pub fn is_alive(&mut self) -> Result<bool, SessionError> {
        match &mut self.child {
            Some(child) => match child.try_wait() {
                Ok(Some(_)) => Ok(false),
                Ok(None) => Ok(true),
                Err(e) => Err(SessionError::Io(e)),
            },
            None => Ok(false),
        }
    }

    /// Tear the session down, killing the child if it has not exited.
    ///
    /// A timed-out assistant must not outlive the attempt, so this reaps the
    /// process before releasing the PTY handles.
    pub async fn close(mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = tokio::task::spawn_blocking(move || {
                if let Ok(None) = child.try_wait() {
                    let _ = child.kill();
                    let _ = child.wait();
                }
            })
            .await;
        }
    }
}
