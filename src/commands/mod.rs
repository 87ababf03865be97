//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `review.rs` — checks/template/evaluate/record.
//! - `history.rs` — show/export/batch against the review log.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `swapqa::services`.
//! - Keep behavior and output schema stable.

pub mod history;
pub mod review;

pub use history::handle_log_commands;
pub use review::handle_review_commands;
