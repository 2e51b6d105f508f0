use time::Date;

use crate::core::time::format_long_date;
use crate::schemas::schedule::ReportNameEntry;

/// Rebuild the name-entry list for a new date list.
///
/// Entries whose date survives are carried over unchanged, which is what
/// preserves user-edited names across regenerations. Dates that dropped
/// out leave nothing behind; new dates get a synthesized default name.
/// Pure and idempotent.
pub fn reconcile(
    assignment_name: &str,
    dates: &[Date],
    previous: &[ReportNameEntry],
) -> Vec<ReportNameEntry> {
    dates
        .iter()
        .map(|date| {
            previous.iter().find(|entry| entry.date == *date).cloned().unwrap_or_else(|| {
                ReportNameEntry {
                    date: *date,
                    report_name: default_report_name(assignment_name, *date, dates.len()),
                }
            })
        })
        .collect()
}

/// `"<AssignmentName> <Month> <Day>, <Year>"` once the schedule holds more
/// than one date; a single-date schedule just reuses the assignment name.
pub(crate) fn default_report_name(assignment_name: &str, date: Date, total_dates: usize) -> String {
    if total_dates > 1 {
        format!("{assignment_name} {}", format_long_date(date))
    } else {
        assignment_name.to_string()
    }
}

/// Append a user-picked date. Duplicates are rejected as a no-op; the
/// list keeps insertion order.
pub fn add_specific_date(dates: &mut Vec<Date>, date: Date) -> bool {
    if dates.contains(&date) {
        return false;
    }
    dates.push(date);
    true
}

/// Remove by exact date match; absent dates are a no-op.
pub fn remove_specific_date(dates: &mut Vec<Date>, date: Date) -> bool {
    let before = dates.len();
    dates.retain(|existing| *existing != date);
    dates.len() != before
}
