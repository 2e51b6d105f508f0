use time::{macros::format_description, Date, Duration, Month};

/// Parse a calendar date in the `YYYY-MM-DD` form the backend exchanges.
pub fn parse_iso_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), &format_description!("[year]-[month]-[day]")).ok()
}

pub fn format_iso_date(date: Date) -> String {
    date.format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Display form used in generated report names, e.g. `January 15, 2025`.
pub(crate) fn format_long_date(date: Date) -> String {
    date.format(&format_description!("[month repr:long] [day padding:none], [year]"))
        .unwrap_or_else(|_| date.to_string())
}

pub(crate) fn add_weeks(date: Date, weeks: i64) -> Date {
    date.saturating_add(Duration::weeks(weeks))
}

/// Calendar-field month addition: the result keeps the day-of-month,
/// clamped to the target month's length (Jan 31 + 1 month = Feb 28).
pub(crate) fn add_months(date: Date, months: i32) -> Date {
    let total = date.year() * 12 + i32::from(u8::from(date.month())) - 1 + months;
    let year = total.div_euclid(12);
    let month = Month::January.nth_next(total.rem_euclid(12) as u8);
    let day = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

pub(crate) mod iso_date {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub(crate) fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso_date(*date))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
    }
}

pub(crate) mod iso_date_option {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub(crate) fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(value) => serializer.serialize_some(&super::format_iso_date(*value)),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(value) => super::parse_iso_date(&value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {value}"))),
            None => Ok(None),
        }
    }
}
