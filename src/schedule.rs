//! Call-booking calendar rules: the fixed half-hour slots and date parsing.

use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

/// Morning 09:00-11:30 and afternoon 14:00-16:30, every half hour.
pub const TIME_SLOTS: [&str; 12] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30",
];

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn is_time_slot(time: &str) -> bool {
    TIME_SLOTS.contains(&time)
}

/// Parses a `YYYY-MM-DD` calendar day.
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: Date) -> String {
    // the format has no fallible components for a valid Date
    date.format(DATE_FORMAT).unwrap_or_default()
}

/// Current calendar day in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Days before `today` cannot be picked.
pub fn is_date_disabled(date: Date, today: Date) -> bool {
    date < today
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn slots_cover_morning_and_afternoon() {
        assert_eq!(TIME_SLOTS.len(), 12);
        assert!(is_time_slot("09:00"));
        assert!(is_time_slot("11:30"));
        assert!(is_time_slot("16:30"));
        assert!(!is_time_slot("12:00"));
        assert!(!is_time_slot("17:00"));
        assert!(!is_time_slot("9:00"));
    }

    #[test]
    fn dates_parse_and_format_as_iso_days() {
        let d = parse_date("2024-12-25").expect("valid date");
        assert_eq!(d, date!(2024 - 12 - 25));
        assert_eq!(format_date(d), "2024-12-25");
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_date("25/12/2024").is_none());
    }

    #[test]
    fn only_past_days_are_disabled() {
        let today = date!(2026 - 10 - 19);
        assert!(is_date_disabled(date!(2026 - 10 - 18), today));
        assert!(!is_date_disabled(today, today));
        assert!(!is_date_disabled(date!(2026 - 10 - 20), today));
    }
}
