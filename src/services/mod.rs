//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `evaluator.rs` — priority-ordered PASS/FAIL rule chain.
//! - `formatter.rs` — one-line verdict rendering.
//! - `record_store.rs` — review records, session/CSV logs, header reconciliation, export.
//! - `storage.rs` — settings file, log path resolution, state/batch file loading.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible (`evaluator`, `formatter` never touch I/O).
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod evaluator;
pub mod formatter;
pub mod output;
pub mod record_store;
pub mod storage;
