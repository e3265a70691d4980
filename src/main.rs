use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use acr_browser::commands::cmd_browse;

/// File the `--debug` log is written to
const LOG_FILE: &str = "acr-browser.log";

#[derive(Parser)]
#[command(name = "acr-browser")]
#[command(about = "Browse Azure Container Registry repositories and tags")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, env = "ACR_BROWSER_CONFIG")]
    config: Option<PathBuf>,

    /// Write a debug log to acr-browser.log
    #[arg(long)]
    debug: bool,
}

fn init_logging() -> std::io::Result<()> {
    let file = File::create(LOG_FILE)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("acr_browser=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.debug {
        if let Err(e) = init_logging() {
            eprintln!("{} could not open {LOG_FILE}: {e}", "warning:".yellow());
        }
    }

    match cmd_browse(cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red());
            ExitCode::FAILURE
        }
    }
}
