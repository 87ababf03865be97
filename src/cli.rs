use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "swapqa",
    version,
    about = "Face-swap QA checklist with automatic PASS/FAIL"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Review log CSV (default: settings log_path, then faceswap_qa_log.csv)"
    )]
    pub log: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Settings file (default: ~/.config/swapqa/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

/// How the checklist state is assembled. Applied in order: base, `--all-ok`,
/// `--provided`, `--fail`, `--set`.
#[derive(Args, Debug, Clone, Default)]
pub struct StateArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "JSON object of check id -> bool to start from instead of the defaults"
    )]
    pub checks: Option<PathBuf>,
    #[arg(long, help = "Mark every non-input check OK")]
    pub all_ok: bool,
    #[arg(long, help = "Tick the three input-completeness checks")]
    pub provided: bool,
    #[arg(long, value_name = "CHECK", help = "Untick a check (repeatable)")]
    pub fail: Vec<String>,
    #[arg(long, value_name = "CHECK=BOOL", help = "Set a check explicitly (repeatable)")]
    pub set: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every check with its category, label and default.
    Checks,
    /// Print the assembled checklist state as JSON, usable with --checks.
    Template {
        #[command(flatten)]
        state: StateArgs,
    },
    /// Evaluate a checklist state and print the verdict.
    Evaluate {
        #[command(flatten)]
        state: StateArgs,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Evaluate and append the review to the log.
    Record {
        #[command(flatten)]
        state: StateArgs,
        #[arg(long)]
        job_id: String,
        #[arg(long)]
        reviewer: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List the rows of the review log.
    Show,
    /// Copy the review log to a new file (header only when no log exists yet).
    Export { dest: PathBuf },
    /// Review a JSON array of {job_id, reviewer, notes, checks} entries in one go.
    Batch {
        input: PathBuf,
        #[arg(long, value_name = "CSV", help = "Write the session log as CSV")]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = false, help = "Also append every review to the log")]
        append: bool,
    },
}
