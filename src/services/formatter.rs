use crate::domain::constants::PASS_LINE;
use crate::domain::verdict::Verdict;

/// Renders the one-line summary a reviewer pastes into a ticket.
pub fn verdict_line(verdict: &Verdict, notes: &str) -> String {
    let reason = match verdict {
        Verdict::Pass => return PASS_LINE.to_string(),
        Verdict::Fail(reason) => reason,
    };
    let mut line = format!("FAIL — Primary: {}.", reason);
    let notes = notes.trim();
    if !notes.is_empty() {
        line.push_str(" Notes: ");
        line.push_str(notes);
    }
    line
}
