//! Plain-text report rendering
//!
//! Renderers return `String`s; printing is left to the caller.

use crate::checker::CheckOutcome;
use crate::storage::{Address, AddressSummary, CheckRecord, TIMESTAMP_FORMAT};
use chrono::{DateTime, Utc};

/// Placeholder for absent values
const EMPTY: &str = "-";

/// Renders the address list, one row per address
pub fn render_address_list(summaries: &[AddressSummary]) -> String {
    if summaries.is_empty() {
        return "No addresses registered yet.\n".to_string();
    }

    let mut out = format!(
        "{:<6} {:<40} {:<20} {}\n",
        "ID", "Name", "Last check", "Status"
    );
    for summary in summaries {
        out.push_str(&format!(
            "{:<6} {:<40} {:<20} {}\n",
            summary.id,
            summary.name,
            timestamp_or_empty(summary.last_check_at),
            status_or_empty(summary.last_status_code)
        ));
    }
    out
}

/// Renders one address and its checks, newest first
pub fn render_check_history(address: &Address, checks: &[CheckRecord]) -> String {
    let mut out = format!("Address #{}: {}\n", address.id, address.name);
    out.push_str(&format!(
        "Registered: {}\n\n",
        address.created_at.format(TIMESTAMP_FORMAT)
    ));

    if checks.is_empty() {
        out.push_str("No checks yet.\n");
        return out;
    }

    out.push_str(&format!("Checks ({}):\n", checks.len()));
    for check in checks {
        out.push_str(&format!(
            "  #{} {} status={}\n",
            check.id,
            check.created_at.format(TIMESTAMP_FORMAT),
            status_or_empty(check.status_code)
        ));
        out.push_str(&field_line("h1", check.h1.as_deref()));
        out.push_str(&field_line("title", check.title.as_deref()));
        out.push_str(&field_line("description", check.description.as_deref()));
    }
    out
}

/// Renders the result of a check that just ran
pub fn render_check_outcome(address: &Address, outcome: &CheckOutcome) -> String {
    let mut out = if outcome.success {
        format!("✓ Checked {}\n", address.name)
    } else {
        format!(
            "✗ Check of {} failed: {}\n",
            address.name,
            outcome.check.description.as_deref().unwrap_or(EMPTY)
        )
    };
    out.push_str(&format!(
        "  status={} (record #{})\n",
        status_or_empty(outcome.check.status_code),
        outcome.check_id
    ));
    if outcome.success {
        out.push_str(&field_line("h1", outcome.check.h1.as_deref()));
        out.push_str(&field_line("title", outcome.check.title.as_deref()));
        out.push_str(&field_line(
            "description",
            outcome.check.description.as_deref(),
        ));
    }
    out
}

fn field_line(label: &str, value: Option<&str>) -> String {
    format!("    {}: {}\n", label, value.unwrap_or(EMPTY))
}

fn status_or_empty(status: Option<u16>) -> String {
    status.map_or_else(|| EMPTY.to_string(), |code| code.to_string())
}

fn timestamp_or_empty(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || EMPTY.to_string(),
        |at| at.format(TIMESTAMP_FORMAT).to_string(),
    )
}
