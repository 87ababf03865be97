//! Face-swap QA checklist core.
//!
//! A reviewer's ticked boxes go in as a [`ChecklistState`]; the evaluator returns a
//! [`Verdict`] with one primary reason, and the record store appends the review to a
//! session log or an append-only CSV file. Every front-end (the `swapqa` binary, batch
//! review, embedding applications) shares this one core.
//!
//! [`ChecklistState`]: domain::checklist::ChecklistState
//! [`Verdict`]: domain::verdict::Verdict

pub mod domain;
pub mod services;
