mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use commands::{handle_log_commands, handle_review_commands};
use swapqa::services::storage::{load_settings, resolve_log_path};

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so --json output on stdout stays parseable.
    env_logger::init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    let log_path = resolve_log_path(cli.log.as_deref(), &settings);
    log::debug!("review log: {}", log_path.display());

    if handle_log_commands(&cli, &settings, &log_path)? {
        return Ok(());
    }
    handle_review_commands(&cli, &settings, &log_path)
}
