//! Clawfetch: scrape the Claude Code usage percentage for the OpenClaw pet.
//!
//! The pet UI wants a single number: how much of the current 5-hour usage
//! window has been consumed. The assistant only reports it inside an
//! interactive terminal session, so this crate drives that session and
//! digs the number out of whatever text comes back.
//!
//! Three capture strategies run in order, stopping at the first success:
//!
//! 1. [`driver::InteractiveDriver`]: a PTY session that waits for the
//!    prompt, types the usage command, and reads the reply.
//! 2. [`driver::PipeDriver`]: plain stdio pipes, for builds that accept
//!    line-oriented input.
//! 3. [`driver::TerminalScriptDriver`]: Terminal.app automation, macOS only.
//!
//! The captured text goes through an ordered regex cascade
//! ([`parse::extract_percentage`]) and the winning integer is persisted as a
//! JSON [`UsageSnapshot`] at `~/.openclaw-pet/real-usage.json`, fully
//! replacing the previous snapshot.
//!
//! # Quick start
//!
//! ```no_run
//! use clawfetch::driver::{self, DriverSettings};
//!
//! # async fn example() -> Result<(), clawfetch::FetchError> {
//! let settings = DriverSettings::default();
//! let snapshot = clawfetch::fetch_and_save(
//!     &driver::default_chain(),
//!     &settings,
//!     &clawfetch::snapshot::default_path()?,
//! )
//! .await?;
//! println!("usage is at {}%", snapshot.percentage);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod buffer;
mod fetch;

pub mod driver;
pub mod parse;
pub mod pattern;
pub mod result;
pub mod session;
pub mod snapshot;

// Public API exports
pub use fetch::fetch_and_save;
pub use pattern::Pattern;
pub use result::{FetchError, MatchOutcome, SessionError};
pub use session::{Session, SessionBuilder};
pub use snapshot::UsageSnapshot;
