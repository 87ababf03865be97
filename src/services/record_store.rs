use crate::domain::checklist::{parse_flag, CheckId, ChecklistState, StateError};
use crate::domain::constants::{METADATA_COLUMNS, TIMESTAMP_FORMAT};
use crate::domain::models::{LogRow, ReviewRecord};
use crate::domain::verdict::Verdict;
use chrono::{DateTime, TimeZone};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("could not {action} review log {}: {source}", path.display())]
    Persistence {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not export review log to {}: {source}", dest.display())]
    Export {
        dest: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode review rows: {0}")]
    Encode(#[from] csv::Error),
}

fn persistence<'a>(
    action: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> StoreError + 'a {
    move |source| StoreError::Persistence {
        action,
        path: path.to_path_buf(),
        source,
    }
}

fn export_err(dest: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Export {
        dest: dest.to_path_buf(),
        source,
    }
}

/// Anything a committed review can be appended to.
pub trait ReviewLog {
    fn append(&mut self, record: &ReviewRecord) -> Result<(), StoreError>;
}

pub fn build_record<Tz>(
    checks: &ChecklistState,
    verdict: &Verdict,
    job_id: &str,
    reviewer: &str,
    notes: &str,
    now: &DateTime<Tz>,
) -> ReviewRecord
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ReviewRecord {
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        job_id: job_id.trim().to_string(),
        reviewer: reviewer.trim().to_string(),
        result: verdict.outcome(),
        primary_fail_reason: verdict.primary_reason().to_string(),
        notes: notes.trim().to_string(),
        checks: checks.clone(),
    }
}

fn bool_cell(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Column order for a full catalogue: metadata, then check ids sorted lexicographically.
pub fn default_columns() -> Vec<String> {
    METADATA_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(CheckId::sorted_by_id().into_iter().map(|c| c.to_string()))
        .collect()
}

/// Freshly computed column order for one record.
pub fn record_columns(record: &ReviewRecord) -> Vec<String> {
    let mut ids: Vec<&str> = record.checks.iter().map(|(id, _)| id.as_str()).collect();
    ids.sort_unstable();
    METADATA_COLUMNS
        .iter()
        .chain(ids.iter())
        .map(|c| c.to_string())
        .collect()
}

pub fn record_cells(record: &ReviewRecord) -> LogRow {
    let mut cells = LogRow::new();
    cells.insert("timestamp".into(), record.timestamp.clone());
    cells.insert("job_id".into(), record.job_id.clone());
    cells.insert("reviewer".into(), record.reviewer.clone());
    cells.insert("result".into(), record.result.as_str().to_string());
    cells.insert(
        "primary_fail_reason".into(),
        record.primary_fail_reason.clone(),
    );
    cells.insert("notes".into(), record.notes.clone());
    for (id, value) in record.checks.iter() {
        cells.insert(id.to_string(), bool_cell(value).to_string());
    }
    cells
}

fn encode_rows(
    columns: &[String],
    records: &[&ReviewRecord],
    with_header: bool,
) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if with_header {
        writer.write_record(columns)?;
    }
    for record in records {
        let cells = record_cells(record);
        writer.write_record(
            columns
                .iter()
                .map(|c| cells.get(c).map(String::as_str).unwrap_or("")),
        )?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Turns the check cells of a log row back into a checklist state.
pub fn decode_checks(row: &LogRow) -> Result<ChecklistState, StateError> {
    let mut state = ChecklistState::empty();
    for (column, cell) in row {
        if METADATA_COLUMNS.contains(&column.as_str()) {
            continue;
        }
        let id: CheckId = column.parse()?;
        let value = parse_flag(cell).ok_or_else(|| StateError::InvalidValue {
            id: column.clone(),
            value: cell.clone(),
        })?;
        state.set(id, value);
    }
    Ok(state)
}

/// In-memory log of the current review session. Cleared only as a whole.
#[derive(Debug, Default)]
pub struct SessionLog {
    records: Vec<ReviewRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// CSV rendering with the header taken from the first record. Empty when no rows.
    pub fn to_csv(&self) -> Result<String, StoreError> {
        let first = match self.records.first() {
            Some(r) => r,
            None => return Ok(String::new()),
        };
        let columns = record_columns(first);
        let rows: Vec<&ReviewRecord> = self.records.iter().collect();
        let bytes = encode_rows(&columns, &rows, true)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn write_csv(&self, dest: &Path) -> Result<(), StoreError> {
        let body = self.to_csv()?;
        ensure_parent(dest).map_err(export_err(dest))?;
        fs::write(dest, body).map_err(export_err(dest))?;
        info!("wrote {} session rows to {}", self.len(), dest.display());
        Ok(())
    }
}

impl ReviewLog for SessionLog {
    fn append(&mut self, record: &ReviewRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Append-only CSV log on disk.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First row of the file, if there is one.
    pub fn read_header(&self) -> Result<Option<Vec<String>>, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        let mut first = csv::StringRecord::new();
        if reader.read_record(&mut first)? {
            Ok(Some(first.iter().map(str::to_string).collect()))
        } else {
            Ok(None)
        }
    }

    /// Picks the column order for appending to an existing file. The file's own order
    /// wins when it holds exactly the same set of columns; anything else falls back to
    /// the fresh order, even if that misaligns the file.
    fn reconcile_columns(&self, fresh: Vec<String>) -> Vec<String> {
        match self.read_header() {
            Ok(Some(existing)) => {
                let existing_set: BTreeSet<&str> = existing.iter().map(String::as_str).collect();
                let fresh_set: BTreeSet<&str> = fresh.iter().map(String::as_str).collect();
                if existing_set == fresh_set {
                    debug!("reusing column order of {}", self.path.display());
                    existing
                } else {
                    warn!(
                        "header of {} does not match record columns; appending in default order",
                        self.path.display()
                    );
                    fresh
                }
            }
            Ok(None) => fresh,
            Err(e) => {
                warn!(
                    "could not read header of {}: {}; appending in default order",
                    self.path.display(),
                    e
                );
                fresh
            }
        }
    }

    /// True when the file has content that does not end in a line terminator.
    fn ends_mid_line(&self) -> io::Result<bool> {
        let meta = fs::metadata(&self.path)?;
        if !meta.is_file() || meta.len() == 0 {
            return Ok(false);
        }
        let mut file = fs::File::open(&self.path)?;
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(!matches!(last[0], b'\n' | b'\r'))
    }
}

impl ReviewLog for CsvLog {
    fn append(&mut self, record: &ReviewRecord) -> Result<(), StoreError> {
        let fresh = record_columns(record);
        let write_header = !self.path.exists();
        let columns = if write_header {
            fresh
        } else {
            self.reconcile_columns(fresh)
        };

        // Encode the whole row first so a failure never leaves half a row behind.
        let mut bytes = encode_rows(&columns, &[record], write_header)?;
        if !write_header
            && self
                .ends_mid_line()
                .map_err(persistence("read", &self.path))?
        {
            debug!("{} lacks a trailing newline; terminating it", self.path.display());
            bytes.insert(0, b'\n');
        }

        ensure_parent(&self.path).map_err(persistence("create directory for", &self.path))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(persistence("open", &self.path))?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .map_err(persistence("append to", &self.path))?;

        info!(
            "appended {} review for {} to {}",
            record.result,
            record.job_id,
            self.path.display()
        );
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Reads every row of a log keyed by its header. A missing file reads as empty.
pub fn read_log(path: &Path) -> Result<Vec<LogRow>, StoreError> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let to_io = |e: csv::Error| io::Error::from(e);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(to_io)
        .map_err(persistence("open", path))?;
    let headers = reader
        .headers()
        .map_err(to_io)
        .map_err(persistence("read", path))?
        .clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(to_io).map_err(persistence("read", path))?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

/// Copies the log to `dest`, or writes a header-only file when no log exists yet.
/// Returns whether only the header was written.
pub fn export(log_path: &Path, dest: &Path) -> Result<bool, StoreError> {
    if log_path.exists() && dest.exists() {
        let same = fs::canonicalize(log_path).map_err(export_err(dest))?
            == fs::canonicalize(dest).map_err(export_err(dest))?;
        if same {
            return Err(StoreError::Export {
                dest: dest.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "destination is the review log itself",
                ),
            });
        }
    }

    ensure_parent(dest).map_err(export_err(dest))?;
    if log_path.exists() {
        fs::copy(log_path, dest).map_err(export_err(dest))?;
        info!("exported {} to {}", log_path.display(), dest.display());
        Ok(false)
    } else {
        let bytes = encode_rows(&default_columns(), &[], true)
            .map_err(io::Error::from)
            .map_err(export_err(dest))?;
        fs::write(dest, bytes).map_err(export_err(dest))?;
        info!("no log yet; wrote header-only export to {}", dest.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::verdict::{FailReason, Outcome};
    use crate::services::evaluator::evaluate;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record_for(job: &str, state: &ChecklistState) -> ReviewRecord {
        let verdict = evaluate(state).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 12, 11, 9, 30, 5).unwrap();
        build_record(state, &verdict, job, " Liman ", " edge blur ", &now)
    }

    fn raw_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn build_record_trims_metadata_and_formats_timestamp() {
        let state = ChecklistState::all_ok().with(CheckId::FNoWarping, false);
        let record = record_for("  FS_001 ", &state);
        assert_eq!(record.timestamp, "2025-12-11T09:30:05");
        assert_eq!(record.job_id, "FS_001");
        assert_eq!(record.reviewer, "Liman");
        assert_eq!(record.notes, "edge blur");
        assert_eq!(record.result, Outcome::Fail);
        assert_eq!(
            record.primary_fail_reason,
            FailReason::VisibleArtifacts.as_str()
        );
    }

    #[test]
    fn pass_record_has_empty_reason() {
        let record = record_for("FS_001", &ChecklistState::all_ok());
        assert_eq!(record.result, Outcome::Pass);
        assert_eq!(record.primary_fail_reason, "");
    }

    #[test]
    fn columns_are_metadata_then_sorted_check_ids() {
        let record = record_for("FS_001", &ChecklistState::all_ok());
        let columns = record_columns(&record);
        assert_eq!(columns.len(), 6 + CheckId::ALL.len());
        assert_eq!(&columns[..6], &METADATA_COLUMNS.map(String::from));
        assert_eq!(columns[6], "a_output_provided");
        assert_eq!(columns.last().unwrap(), "h_no_extra_missing_limbs");
        assert_eq!(columns, default_columns());
    }

    #[test]
    fn first_append_writes_header_and_later_appends_do_not() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/log.csv");
        let mut log = CsvLog::new(&path);

        log.append(&record_for("FS_001", &ChecklistState::all_ok()))
            .unwrap();
        log.append(&record_for("FS_002", &ChecklistState::defaults()))
            .unwrap();

        let lines = raw_lines(&path);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,job_id,reviewer,result,primary_fail_reason,notes,a_output_provided"));
        assert!(lines[1].contains("FS_001,Liman,PASS,,edge blur,True"));
        assert!(lines[2].contains("FAIL,missing required image(s)"));
    }

    #[test]
    fn appended_rows_decode_back_to_original_state() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.csv");
        let state = ChecklistState::all_ok()
            .with(CheckId::EPoseMatch, false)
            .with(CheckId::EMouthMatch, false);
        CsvLog::new(&path)
            .append(&record_for("FS_003", &state))
            .unwrap();

        let rows = read_log(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["job_id"], "FS_003");
        assert_eq!(
            rows[0]["primary_fail_reason"],
            "head pose mismatch (Target → Output)"
        );
        assert_eq!(rows[0]["e_pose_match"], "False");
        assert_eq!(decode_checks(&rows[0]).unwrap(), state);
    }

    #[test]
    fn existing_header_order_is_reused_when_sets_match() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.csv");
        let mut reversed = default_columns();
        reversed.reverse();
        fs::write(&path, format!("{}\n", reversed.join(","))).unwrap();

        let state = ChecklistState::all_ok().with(CheckId::HNoBackgroundGlitch, false);
        CsvLog::new(&path)
            .append(&record_for("FS_004", &state))
            .unwrap();

        let lines = raw_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], reversed.join(","));
        // reversed order ends with the metadata columns
        assert!(lines[1].ends_with(
            "edge blur,anatomical artifact / logical inconsistency,FAIL,Liman,FS_004,2025-12-11T09:30:05"
        ));
        assert!(lines[1].starts_with("True,True,False,"));

        let rows = read_log(&path).unwrap();
        assert_eq!(rows[0]["h_no_background_glitch"], "False");
        assert_eq!(decode_checks(&rows[0]).unwrap(), state);
    }

    #[test]
    fn differing_header_falls_back_to_fresh_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.csv");
        fs::write(&path, "timestamp,job_id,verdict\n").unwrap();

        CsvLog::new(&path)
            .append(&record_for("FS_005", &ChecklistState::all_ok()))
            .unwrap();

        let lines = raw_lines(&path);
        assert_eq!(lines[0], "timestamp,job_id,verdict");
        assert!(lines[1].starts_with("2025-12-11T09:30:05,FS_005,Liman,PASS,,edge blur,"));
        assert_eq!(lines[1].split(',').count(), default_columns().len());
    }

    #[test]
    fn log_without_trailing_newline_gets_terminated_before_row() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.csv");
        fs::write(&path, default_columns().join(",")).unwrap();

        CsvLog::new(&path)
            .append(&record_for("FS_014", &ChecklistState::all_ok()))
            .unwrap();

        let lines = raw_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], default_columns().join(","));
        let rows = read_log(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["job_id"], "FS_014");
    }

    #[test]
    fn unreadable_header_falls_back_to_fresh_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.csv");
        fs::write(&path, b"\xff\xfe,job\n").unwrap();

        CsvLog::new(&path)
            .append(&record_for("FS_015", &ChecklistState::all_ok()))
            .unwrap();

        let raw = fs::read(&path).unwrap();
        assert!(raw.starts_with(b"\xff\xfe,job\n"));
        let row = String::from_utf8(raw[b"\xff\xfe,job\n".len()..].to_vec()).unwrap();
        assert!(row.starts_with("2025-12-11T09:30:05,FS_015,Liman,PASS,,edge blur,True"));
        assert_eq!(
            row.trim_end().split(',').count(),
            default_columns().len()
        );
    }

    #[test]
    fn empty_existing_file_gets_no_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.csv");
        fs::write(&path, "").unwrap();

        CsvLog::new(&path)
            .append(&record_for("FS_006", &ChecklistState::all_ok()))
            .unwrap();

        let lines = raw_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("2025-12-11T09:30:05,FS_006"));
    }

    #[test]
    fn notes_with_commas_are_quoted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.csv");
        let state = ChecklistState::all_ok().with(CheckId::FNoWarping, false);
        let verdict = evaluate(&state).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 12, 11, 9, 30, 5).unwrap();
        let record = build_record(&state, &verdict, "FS_007", "Liman", "jaw, ears", &now);
        CsvLog::new(&path).append(&record).unwrap();

        assert!(fs::read_to_string(&path).unwrap().contains("\"jaw, ears\""));
        assert_eq!(read_log(&path).unwrap()[0]["notes"], "jaw, ears");
    }

    #[test]
    fn append_to_directory_is_a_persistence_error() {
        let tmp = TempDir::new().unwrap();
        let err = CsvLog::new(tmp.path())
            .append(&record_for("FS_008", &ChecklistState::all_ok()))
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence { .. }));
    }

    #[test]
    fn read_log_of_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_log(&tmp.path().join("none.csv")).unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_unknown_columns_and_bad_cells() {
        let mut row = LogRow::new();
        row.insert("job_id".into(), "FS_009".into());
        row.insert("e_pose_match".into(), "perhaps".into());
        assert!(matches!(
            decode_checks(&row),
            Err(StateError::InvalidValue { .. })
        ));

        row.remove("e_pose_match");
        row.insert("x_extra".into(), "True".into());
        assert_eq!(
            decode_checks(&row),
            Err(StateError::UnknownCheck("x_extra".into()))
        );
    }

    #[test]
    fn export_without_log_writes_header_only() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("out/export.csv");
        let header_only = export(&tmp.path().join("missing.csv"), &dest).unwrap();
        assert!(header_only);
        assert_eq!(raw_lines(&dest), vec![default_columns().join(",")]);
    }

    #[test]
    fn export_copies_existing_log() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.csv");
        CsvLog::new(&path)
            .append(&record_for("FS_010", &ChecklistState::all_ok()))
            .unwrap();
        let dest = tmp.path().join("copy.csv");
        assert!(!export(&path, &dest).unwrap());
        assert_eq!(fs::read(&path).unwrap(), fs::read(&dest).unwrap());
    }

    #[test]
    fn export_onto_the_log_itself_is_refused() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.csv");
        CsvLog::new(&path)
            .append(&record_for("FS_011", &ChecklistState::all_ok()))
            .unwrap();
        let before = fs::read(&path).unwrap();
        assert!(matches!(
            export(&path, &path),
            Err(StoreError::Export { .. })
        ));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn export_under_a_file_is_an_export_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let err = export(&tmp.path().join("missing.csv"), &blocker.join("out.csv")).unwrap_err();
        assert!(matches!(err, StoreError::Export { .. }));
    }

    #[test]
    fn session_log_renders_and_clears() {
        let mut session = SessionLog::new();
        assert_eq!(session.to_csv().unwrap(), "");

        session
            .append(&record_for("FS_012", &ChecklistState::all_ok()))
            .unwrap();
        session
            .append(&record_for("FS_013", &ChecklistState::defaults()))
            .unwrap();
        assert_eq!(session.len(), 2);

        let csv = session.to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], default_columns().join(","));
        assert!(lines[2].contains("FS_013"));

        session.clear();
        assert!(session.is_empty());
    }
}
