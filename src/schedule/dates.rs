use time::Date;

use crate::core::time::{add_months, add_weeks};
use crate::schemas::schedule::{PeriodUnit, RecurrenceRule};

pub(crate) const DEFAULT_INTERVAL: u32 = 1;
pub(crate) const DEFAULT_PERIOD: PeriodUnit = PeriodUnit::Quarter;
pub(crate) const DEFAULT_OCCURRENCE_COUNT: u32 = 4;

/// Derive the due-date sequence from a recurrence rule.
///
/// A rule without a first occurrence is incomplete, not invalid: it yields
/// an empty sequence. The anchor date is returned verbatim as element 0 so
/// it never drifts through arithmetic; every later date is the anchor
/// advanced by `i * interval` period units using calendar-field addition.
pub fn generate_recurring_dates(rule: &RecurrenceRule) -> Vec<Date> {
    let Some(first) = rule.first_occurrence else {
        return Vec::new();
    };

    let interval = rule.interval.unwrap_or(DEFAULT_INTERVAL);
    let period = rule.period.unwrap_or(DEFAULT_PERIOD);
    let count = rule.occurrence_count.unwrap_or(DEFAULT_OCCURRENCE_COUNT);

    let mut dates = Vec::with_capacity(count as usize);
    dates.push(first);

    for step in 1..count {
        let units = i64::from(interval) * i64::from(step);
        let date = match period {
            PeriodUnit::Week => add_weeks(first, units),
            PeriodUnit::Month => add_months(first, units as i32),
            PeriodUnit::Quarter => add_months(first, (units * 3) as i32),
            PeriodUnit::Year => add_months(first, (units * 12) as i32),
        };
        dates.push(date);
    }

    dates
}
