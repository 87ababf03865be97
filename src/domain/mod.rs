//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep the checklist catalogue, verdict and record types in one place.
//! - Make JSON output and CSV log schema changes explicit and reviewable.
//!
//! ## Files
//! - `checklist.rs` — check ids, categories, checklist state value.
//! - `verdict.rs` — outcome, fail reasons, verdict.
//! - `models.rs` — review record, settings, report/output structs.
//! - `constants.rs` — stable constants (default log path, column names, PASS line).
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs, the CSV log columns and
//! integration contracts. Keep them synchronized with `docs/contracts/*`.

pub mod checklist;
pub mod constants;
pub mod models;
pub mod verdict;
