use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

/// How an assignment's due dates are defined: an explicit list the user
/// manages one date at a time, or a recurrence rule the dates are derived
/// from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    #[default]
    SpecificDates,
    RecurringDates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Week,
    Month,
    Quarter,
    Year,
}

/// The four-field recurrence rule. All fields are optional while the user
/// is still filling in the form; generation applies the documented
/// defaults for everything except the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RecurrenceRule {
    #[serde(default, alias = "firstOccurrence", with = "crate::core::time::iso_date_option")]
    pub first_occurrence: Option<Date>,
    #[serde(default)]
    #[validate(range(min = 1, message = "interval must be positive"))]
    pub interval: Option<u32>,
    #[serde(default)]
    pub period: Option<PeriodUnit>,
    #[serde(default, alias = "occurrenceCount")]
    #[validate(range(min = 1, message = "occurrence_count must be positive"))]
    pub occurrence_count: Option<u32>,
}

impl RecurrenceRule {
    pub fn is_empty(&self) -> bool {
        self.first_occurrence.is_none()
            && self.interval.is_none()
            && self.period.is_none()
            && self.occurrence_count.is_none()
    }
}

/// One report name per due date. Dates are unique within a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportNameEntry {
    #[serde(with = "crate::core::time::iso_date")]
    pub date: Date,
    #[serde(alias = "reportName")]
    pub report_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SchedulePayload {
    #[serde(alias = "scheduleType")]
    pub schedule_type: ScheduleType,
    #[serde(default, alias = "reportNames")]
    pub report_names: Vec<ReportNameEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub recurrence: Option<RecurrenceRule>,
}
