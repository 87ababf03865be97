use crate::domain::checklist::ChecklistState;
use crate::domain::verdict::Outcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Deserialize, Default)]
pub struct SettingsFile {
    #[serde(default)]
    pub general: SettingsGeneral,
}

#[derive(Debug, Deserialize, Default)]
pub struct SettingsGeneral {
    #[serde(default)]
    pub log_path: Option<String>,
    #[serde(default)]
    pub reviewer: Option<String>,
}

/// One committed review. Built once by the record store and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    pub timestamp: String,
    pub job_id: String,
    pub reviewer: String,
    pub result: Outcome,
    pub primary_fail_reason: String,
    pub notes: String,
    pub checks: ChecklistState,
}

/// A log row read back from disk, keyed by header name.
pub type LogRow = BTreeMap<String, String>;

#[derive(Serialize)]
pub struct CheckInfo {
    pub id: String,
    pub category: String,
    pub label: String,
    pub default: bool,
}

#[derive(Serialize)]
pub struct EvaluationReport {
    pub result: Outcome,
    pub primary_fail_reason: String,
    pub line: String,
    pub other_failures: Vec<String>,
    pub checks: ChecklistState,
}

#[derive(Serialize)]
pub struct RecordReport {
    pub log_path: String,
    pub line: String,
    pub record: ReviewRecord,
}

#[derive(Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub job_id: String,
    pub reviewer: String,
    pub result: String,
    pub primary_fail_reason: String,
    pub notes: String,
    pub failed_checks: Vec<String>,
}

#[derive(Serialize)]
pub struct ExportReport {
    pub source: String,
    pub destination: String,
    pub header_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct BatchEntry {
    pub job_id: String,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub checks: BTreeMap<String, bool>,
}

#[derive(Serialize)]
pub struct BatchItem {
    pub job_id: String,
    pub result: Outcome,
    pub primary_fail_reason: String,
}

#[derive(Serialize)]
pub struct BatchReport {
    pub reviewed: usize,
    pub passed: usize,
    pub failed: usize,
    pub items: Vec<BatchItem>,
    pub csv_out: Option<String>,
    pub appended_to: Option<String>,
}
