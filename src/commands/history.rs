use crate::cli::{Cli, Commands};
use anyhow::Context;
use std::path::Path;
use swapqa::domain::checklist::ChecklistState;
use swapqa::domain::models::{BatchItem, BatchReport, ExportReport, LogEntry, SettingsFile};
use swapqa::domain::verdict::Outcome;
use swapqa::services::evaluator::evaluate;
use swapqa::services::output::{print_one, print_out};
use swapqa::services::record_store::{
    build_record, decode_checks, export, read_log, CsvLog, ReviewLog, SessionLog,
};
use swapqa::services::storage::load_batch_file;

/// Handles the commands that work on the review log. Returns `false` when the command
/// belongs elsewhere.
pub fn handle_log_commands(
    cli: &Cli,
    settings: &SettingsFile,
    log_path: &Path,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Show => {
            let entries = read_log(log_path)?
                .into_iter()
                .map(log_entry)
                .collect::<Vec<_>>();
            print_out(cli.json, &entries, |e| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    e.timestamp, e.job_id, e.reviewer, e.result, e.primary_fail_reason
                )
            })?;
        }
        Commands::Export { dest } => {
            let header_only = export(log_path, dest)?;
            let report = ExportReport {
                source: log_path.display().to_string(),
                destination: dest.display().to_string(),
                header_only,
            };
            print_one(cli.json, report, |r| {
                if r.header_only {
                    format!("no log yet; wrote header to {}", r.destination)
                } else {
                    format!("exported {} to {}", r.source, r.destination)
                }
            })?;
        }
        Commands::Batch { input, out, append } => {
            let report = run_batch(
                input,
                out.as_deref(),
                append.then_some(log_path),
                settings,
            )?;
            print_one(cli.json, report, |r| {
                let mut lines: Vec<String> = r
                    .items
                    .iter()
                    .map(|i| format!("{}\t{}\t{}", i.job_id, i.result, i.primary_fail_reason))
                    .collect();
                lines.push(format!(
                    "reviewed {}: {} passed, {} failed",
                    r.reviewed, r.passed, r.failed
                ));
                lines.join("\n")
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn log_entry(mut row: swapqa::domain::models::LogRow) -> LogEntry {
    let failed_checks = match decode_checks(&row) {
        Ok(state) => failed_ids(&state),
        Err(e) => {
            log::warn!("could not decode checks of logged row: {}", e);
            vec![]
        }
    };
    let mut take = |k: &str| row.remove(k).unwrap_or_default();
    LogEntry {
        timestamp: take("timestamp"),
        job_id: take("job_id"),
        reviewer: take("reviewer"),
        result: take("result"),
        primary_fail_reason: take("primary_fail_reason"),
        notes: take("notes"),
        failed_checks,
    }
}

fn failed_ids(state: &ChecklistState) -> Vec<String> {
    state
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(id, _)| id.to_string())
        .collect()
}

fn run_batch(
    input: &Path,
    out: Option<&Path>,
    append_to: Option<&Path>,
    settings: &SettingsFile,
) -> anyhow::Result<BatchReport> {
    let entries = load_batch_file(input)?;
    let mut session = SessionLog::new();
    let mut file_log = append_to.map(CsvLog::new);
    let default_reviewer = settings.general.reviewer.as_deref().unwrap_or("");
    let now = chrono::Local::now();

    for entry in entries {
        let state = ChecklistState::from_raw(entry.checks)
            .with_context(|| format!("batch entry {}", entry.job_id))?;
        let verdict =
            evaluate(&state).with_context(|| format!("batch entry {}", entry.job_id))?;
        let reviewer = entry.reviewer.as_deref().unwrap_or(default_reviewer);
        let record = build_record(&state, &verdict, &entry.job_id, reviewer, &entry.notes, &now);
        session.append(&record)?;
        if let Some(log) = file_log.as_mut() {
            log.append(&record)?;
        }
    }

    if let Some(dest) = out {
        session.write_csv(dest)?;
    }

    let items: Vec<BatchItem> = session
        .records()
        .iter()
        .map(|r| BatchItem {
            job_id: r.job_id.clone(),
            result: r.result,
            primary_fail_reason: r.primary_fail_reason.clone(),
        })
        .collect();
    let passed = items.iter().filter(|i| i.result == Outcome::Pass).count();
    Ok(BatchReport {
        reviewed: items.len(),
        passed,
        failed: items.len() - passed,
        items,
        csv_out: out.map(|p| p.display().to_string()),
        appended_to: append_to.map(|p| p.display().to_string()),
    })
}
