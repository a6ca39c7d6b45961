//! Session builder for configuration

use crate::buffer::CaptureBuffer;
use crate::result::SessionError;
use crate::session::Session;
use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Default timeout for expect operations (in seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default PTY rows
const DEFAULT_PTY_ROWS: u16 = 24;

/// Default PTY columns
const DEFAULT_PTY_COLS: u16 = 80;

/// Builder for configuring and spawning sessions.
///
/// # Defaults
///
/// - Timeout: 10 seconds
/// - ANSI stripping: enabled (assistants paint heavily colored output)
/// - PTY size: 24 rows x 80 columns
///
/// # Examples
///
/// ```no_run
/// use clawfetch::Session;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), clawfetch::SessionError> {
/// let session = Session::builder()
///     .timeout(Duration::from_secs(10))
///     .spawn("claude")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    timeout: Option<Duration>,
    strip_ansi: bool,
    pty_size: PtySize,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Create a new session builder with default configuration.
    pub fn new() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            strip_ansi: true,
            pty_size: PtySize {
                rows: DEFAULT_PTY_ROWS,
                cols: DEFAULT_PTY_COLS,
                pixel_width: 0,
                pixel_height: 0,
            },
        }
    }

    /// Set the default timeout for expect operations.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the default timeout (wait indefinitely).
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Enable or disable ANSI escape sequence stripping.
    pub fn strip_ansi(mut self, strip: bool) -> Self {
        self.strip_ansi = strip;
        self
    }

    /// Set the PTY (terminal) size the spawned process sees.
    pub fn pty_size(mut self, rows: u16, cols: u16) -> Self {
        self.pty_size = PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        self
    }

    /// Spawn a command and return a configured session.
    ///
    /// The command string is split on whitespace: the first token is the
    /// program, the rest are its arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the command string is empty, the PTY cannot be
    /// created, or the process cannot be spawned.
    pub fn spawn(self, command: &str) -> Result<Session, SessionError> {
        let pty_system = native_pty_system();

        let pty_pair = pty_system
            .openpty(self.pty_size)
            .map_err(|e| SessionError::Pty(e.to_string()))?;

        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| SessionError::Spawn("empty command".to_string()))?;
        let mut cmd = CommandBuilder::new(program);
        for arg in parts {
            cmd.arg(arg);
        }

        let child = pty_pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| SessionError::Spawn(e.to_string()))?;

        let reader = pty_pair
            .master
            .try_clone_reader()
            .map_err(|e| SessionError::Pty(e.to_string()))?;

        // take_writer() consumes ownership, so grab it before the master is
        // stored away.
        let writer = pty_pair
            .master
            .take_writer()
            .map_err(|e| SessionError::Pty(e.to_string()))?;

        // The child owns its end of the PTY now. Dropping the slave handle
        // here is what lets the master report end-of-stream when the child
        // exits.
        let portable_pty::PtyPair { master, slave } = pty_pair;
        drop(slave);

        Ok(Session {
            _master: master,
            child: Some(child),
            master_reader: Arc::new(Mutex::new(reader)),
            master_writer: Arc::new(Mutex::new(writer)),
            buffer: CaptureBuffer::new(self.strip_ansi),
            timeout: self.timeout,
            eof_reached: false,
        })
    }
}
