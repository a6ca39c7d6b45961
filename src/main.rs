use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clawfetch::driver::{self, DriverSettings};
use clawfetch::{snapshot, FetchError};

/// Fetch the current Claude Code usage and persist it for the OpenClaw pet.
#[derive(Debug, Parser)]
#[command(name = "clawfetch", version, about)]
struct Cli {
    /// Program to drive (must be on PATH)
    #[arg(long, default_value = "claude")]
    command: String,

    /// Write the snapshot here instead of ~/.openclaw-pet/real-usage.json
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seconds to wait for the interactive prompt and per-driver attempts
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error {
                FetchError::NoOutput => {
                    eprintln!("✗ Failed to fetch usage: no driver could capture any output.");
                    eprintln!(
                        "  Make sure Claude Code is installed and you are logged in; \
                         try running `{}` manually once.",
                        cli.command
                    );
                }
                FetchError::NoPercentage => {
                    eprintln!("✗ Captured output but could not find a usage percentage in it.");
                    eprintln!(
                        "  Run `{}` manually and check what /usage prints.",
                        cli.command
                    );
                }
                other => eprintln!("✗ Failed to persist usage snapshot: {other}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), FetchError> {
    let settings = DriverSettings {
        command: cli.command.clone(),
        prompt_timeout: Duration::from_secs(cli.timeout),
        overall_timeout: Duration::from_secs(cli.timeout),
        ..DriverSettings::default()
    };

    let path = match &cli.output {
        Some(path) => path.clone(),
        None => snapshot::default_path()?,
    };

    let snapshot = clawfetch::fetch_and_save(&driver::default_chain(), &settings, &path).await?;

    println!("✓ Usage updated to {}%", snapshot.percentage);
    println!("  Saved to {}", path.display());
    println!("  Resets at {}", snapshot.reset_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}
