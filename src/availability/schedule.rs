use std::collections::HashSet;

use time::{Date, Weekday};

use crate::models::WorkScheduleEntry;

/// Map a platform weekday name ("Sunday".."Saturday") to a [`Weekday`].
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sunday" => Some(Weekday::Sunday),
        "monday" => Some(Weekday::Monday),
        "tuesday" => Some(Weekday::Tuesday),
        "wednesday" => Some(Weekday::Wednesday),
        "thursday" => Some(Weekday::Thursday),
        "friday" => Some(Weekday::Friday),
        "saturday" => Some(Weekday::Saturday),
        _ => None,
    }
}

/// The weekdays on which the provider has at least one schedule window.
///
/// Callers use this to gate which calendar dates are offered at all; dates
/// outside the set are simply not selectable, no error involved.
pub fn selectable_weekdays(schedule: &[WorkScheduleEntry]) -> HashSet<Weekday> {
    schedule
        .iter()
        .filter_map(|entry| parse_weekday(&entry.week_day))
        .collect()
}

pub fn is_date_selectable(schedule: &[WorkScheduleEntry], date: Date) -> bool {
    selectable_weekdays(schedule).contains(&date.weekday())
}

/// The schedule window covering `date`'s weekday, or `None` when the
/// provider does not work that day ("no slots available", not an error).
pub fn window_for_date(schedule: &[WorkScheduleEntry], date: Date) -> Option<&WorkScheduleEntry> {
    schedule
        .iter()
        .find(|entry| parse_weekday(&entry.week_day) == Some(date.weekday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn entry(week_day: &str, from: &str, to: &str) -> WorkScheduleEntry {
        WorkScheduleEntry {
            provider_id: "p-1".to_string(),
            week_day: week_day.to_string(),
            from_time: from.to_string(),
            to_time: to.to_string(),
        }
    }

    #[test]
    fn weekday_names_parse_case_insensitively() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Monday));
        assert_eq!(parse_weekday(" saturday "), Some(Weekday::Saturday));
        assert_eq!(parse_weekday("Mondy"), None);
    }

    #[test]
    fn selectable_weekdays_collects_scheduled_days_only() {
        let schedule = vec![
            entry("Monday", "09:00 AM", "12:00 PM"),
            entry("Wednesday", "01:00 PM", "05:00 PM"),
            entry("not-a-day", "09:00 AM", "12:00 PM"),
        ];
        let days = selectable_weekdays(&schedule);
        assert_eq!(days.len(), 2);
        assert!(days.contains(&Weekday::Monday));
        assert!(days.contains(&Weekday::Wednesday));
    }

    #[test]
    fn window_for_date_matches_the_dates_weekday() {
        let schedule = vec![
            entry("Monday", "09:00 AM", "12:00 PM"),
            entry("Tuesday", "10:00 AM", "04:00 PM"),
        ];
        // 2024-06-10 is a Monday.
        let window = window_for_date(&schedule, date!(2024 - 06 - 10)).unwrap();
        assert_eq!(window.from_time, "09:00 AM");

        // 2024-06-12 is a Wednesday: no entry, no window.
        assert!(window_for_date(&schedule, date!(2024 - 06 - 12)).is_none());
        assert!(!is_date_selectable(&schedule, date!(2024 - 06 - 12)));
    }
}
