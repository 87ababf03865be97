use crate::cli::{Cli, Commands, StateArgs};
use std::path::Path;
use swapqa::domain::checklist::{parse_assignment, Category, CheckId, ChecklistState};
use swapqa::domain::models::{CheckInfo, EvaluationReport, RecordReport, SettingsFile};
use swapqa::services::evaluator::{evaluate, failing_reasons};
use swapqa::services::formatter::verdict_line;
use swapqa::services::output::{print_one, print_out};
use swapqa::services::record_store::{build_record, CsvLog, ReviewLog};
use swapqa::services::storage::load_checks_file;

pub fn handle_review_commands(
    cli: &Cli,
    settings: &SettingsFile,
    log_path: &Path,
) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Checks => {
            let items = list_checks();
            print_out(cli.json, &items, |c| {
                format!("{}\t{}\t{}\t{}", c.category, c.id, c.default, c.label)
            })?;
        }
        Commands::Template { state } => {
            let state = build_state(state)?;
            // Text mode prints the bare object so it can be edited and fed back via --checks.
            print_one(cli.json, &state, |s| {
                serde_json::to_string_pretty(s).unwrap_or_default()
            })?;
        }
        Commands::Evaluate { state, notes } => {
            let state = build_state(state)?;
            let report = evaluation_report(state, notes)?;
            print_one(cli.json, report, render_evaluation)?;
        }
        Commands::Record {
            state,
            job_id,
            reviewer,
            notes,
        } => {
            let state = build_state(state)?;
            let verdict = evaluate(&state)?;
            let reviewer = reviewer
                .as_deref()
                .or(settings.general.reviewer.as_deref())
                .unwrap_or("");
            let record = build_record(
                &state,
                &verdict,
                job_id,
                reviewer,
                notes,
                &chrono::Local::now(),
            );
            let mut log = CsvLog::new(log_path);
            log.append(&record)?;
            let report = RecordReport {
                log_path: log.path().display().to_string(),
                line: verdict_line(&verdict, &record.notes),
                record,
            };
            print_one(cli.json, report, |r| {
                format!(
                    "logged {} for {} to {}\n{}",
                    r.record.result, r.record.job_id, r.log_path, r.line
                )
            })?;
        }
        Commands::Show | Commands::Export { .. } | Commands::Batch { .. } => {
            unreachable!("handled by handle_log_commands")
        }
    }
    Ok(())
}

/// Assembles the checklist state the way a reviewer would tick the form.
pub fn build_state(args: &StateArgs) -> anyhow::Result<ChecklistState> {
    let mut state = match &args.checks {
        Some(path) => load_checks_file(path)?,
        None => ChecklistState::defaults(),
    };
    if args.all_ok {
        state.mark_all_ok();
    }
    if args.provided {
        for id in Category::InputCompleteness.checks() {
            state.set(id, true);
        }
    }
    for raw in &args.fail {
        let id: CheckId = raw.parse()?;
        state.set(id, false);
    }
    for raw in &args.set {
        let (id, value) = parse_assignment(raw)?;
        state.set(id, value);
    }
    Ok(state)
}

fn list_checks() -> Vec<CheckInfo> {
    Category::ALL
        .into_iter()
        .flat_map(|category| {
            category.checks().map(move |id| CheckInfo {
                id: id.to_string(),
                category: format!("{}) {}", category.letter(), category.title()),
                label: id.label().to_string(),
                default: id.default_value(),
            })
        })
        .collect()
}

fn evaluation_report(state: ChecklistState, notes: &str) -> anyhow::Result<EvaluationReport> {
    let verdict = evaluate(&state)?;
    let other_failures = failing_reasons(&state)?
        .into_iter()
        .skip(1)
        .map(|r| r.to_string())
        .collect();
    Ok(EvaluationReport {
        result: verdict.outcome(),
        primary_fail_reason: verdict.primary_reason().to_string(),
        line: verdict_line(&verdict, notes),
        other_failures,
        checks: state,
    })
}

fn render_evaluation(report: &EvaluationReport) -> String {
    let mut out = vec![report.result.to_string()];
    if report.primary_fail_reason.is_empty() {
        out.push("primary fail reason: (none)".to_string());
    } else {
        out.push(format!("primary fail reason: {}", report.primary_fail_reason));
    }
    for other in &report.other_failures {
        out.push(format!("also failing: {}", other));
    }
    out.push(report.line.clone());
    out.join("\n")
}
