use thiserror::Error;
use time::{Date, PrimitiveDateTime, Time};
use tracing::warn;

use super::schedule::window_for_date;
use crate::models::{Appointment, WorkScheduleEntry};

/// Fixed increment between consecutive slot labels.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 15;

const MINUTES_PER_DAY: u32 = 24 * 60;
const MERIDIEM_SHIFT: u32 = 12 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Selected,
    Booked,
}

/// One bookable unit within a provider's daily window. Derived on every
/// engine run, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub label: String,
    pub status: SlotStatus,
}

/// What the booking-submission collaborator receives once a slot is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub date: Date,
    /// The chosen slot resolved to an absolute date-time.
    pub starts_at: PrimitiveDateTime,
    pub from_time: String,
    pub to_time: String,
    pub slot: String,
}

/// Selection refused because the slot is already taken. Purely a signal: no
/// state changed, the caller keeps whatever selection it had.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("slot {slot} on {date} is already booked")]
pub struct SlotTaken {
    pub date: Date,
    pub slot: String,
}

/// Minutes since midnight for a clock label like "09:30 AM", "14:00" or
/// "9:30". A trailing AM/PM marker wins over the literal hour; components
/// that fail to parse collapse to zero, a tolerance the platform's stored
/// windows have historically depended on.
fn parse_clock_minutes(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let (clock, meridiem) = match trimmed.split_once(' ') {
        Some((clock, marker)) => (clock, Some(marker.trim())),
        None => (trimmed, None),
    };

    let mut parts = clock.splitn(2, ':');
    let hour = clock_component(parts.next(), raw);
    let minute = clock_component(parts.next(), raw);

    let hour = match meridiem {
        Some(marker) if marker.eq_ignore_ascii_case("pm") => hour % 12 + 12,
        Some(marker) if marker.eq_ignore_ascii_case("am") => hour % 12,
        _ => hour,
    };

    (hour * 60 + minute) % MINUTES_PER_DAY
}

fn clock_component(part: Option<&str>, raw: &str) -> u32 {
    match part.and_then(|p| p.trim().parse::<u32>().ok()) {
        Some(value) => value,
        None => {
            warn!(value = raw, "unparseable clock component, defaulting to zero");
            0
        }
    }
}

fn format_slot_label(total_minutes: u32) -> String {
    let total = total_minutes % MINUTES_PER_DAY;
    let (hour, minute) = (total / 60, total % 60);
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12:02}:{minute:02} {meridiem}")
}

/// Generate the ordered slot labels for one daily window.
///
/// Labels start at `from_time` and step by `granularity_minutes` while
/// strictly before the effective end. The effective end is `to_time` unless
/// that reads at or before the start, in which case the window crosses the
/// meridiem boundary and the end resolves 12 hours later. Pure function of
/// its inputs.
pub fn generate_slots(from_time: &str, to_time: &str, granularity_minutes: u32) -> Vec<String> {
    if granularity_minutes == 0 {
        // A zero step would never reach the end of the window.
        return Vec::new();
    }

    let start = parse_clock_minutes(from_time);
    let mut end = parse_clock_minutes(to_time);
    if end <= start {
        end += MERIDIEM_SHIFT;
    }

    let mut labels = Vec::new();
    let mut current = start;
    while current < end {
        labels.push(format_slot_label(current));
        current += granularity_minutes;
    }
    labels
}

/// `Booked` iff some appointment matches both the calendar day and the slot
/// label. Selection state is caller-owned and never computed here.
pub fn classify_slot(label: &str, date: Date, booked: &[Appointment]) -> SlotStatus {
    let taken = booked
        .iter()
        .any(|appointment| appointment.appointment_time == label && appointment.date() == Some(date));
    if taken {
        SlotStatus::Booked
    } else {
        SlotStatus::Available
    }
}

/// The full classified slot list for one date, or empty when the provider
/// has no window that weekday.
pub fn day_slots(schedule: &[WorkScheduleEntry], date: Date, booked: &[Appointment]) -> Vec<TimeSlot> {
    let Some(window) = window_for_date(schedule, date) else {
        return Vec::new();
    };
    generate_slots(&window.from_time, &window.to_time, DEFAULT_GRANULARITY_MINUTES)
        .into_iter()
        .map(|label| {
            let status = classify_slot(&label, date, booked);
            TimeSlot { label, status }
        })
        .collect()
}

/// Move the caller's selection to `label`, clearing any previous selection.
/// Booked slots are never selectable; returns whether the selection applied.
pub fn mark_selected(slots: &mut [TimeSlot], label: &str) -> bool {
    for slot in slots.iter_mut() {
        if slot.status == SlotStatus::Selected {
            slot.status = SlotStatus::Available;
        }
    }
    match slots
        .iter_mut()
        .find(|slot| slot.label == label && slot.status == SlotStatus::Available)
    {
        Some(slot) => {
            slot.status = SlotStatus::Selected;
            true
        }
        None => false,
    }
}

/// Commit to a slot: refused when already booked, otherwise resolves the
/// label against the date (12-hour clock, meridiem marker decides the half)
/// and hands back the window bounds for downstream display.
pub fn select_slot(
    label: &str,
    date: Date,
    window: &WorkScheduleEntry,
    booked: &[Appointment],
) -> Result<SelectionResult, SlotTaken> {
    if classify_slot(label, date, booked) == SlotStatus::Booked {
        return Err(SlotTaken {
            date,
            slot: label.to_string(),
        });
    }

    let minutes = parse_clock_minutes(label);
    let time = Time::from_hms((minutes / 60) as u8, (minutes % 60) as u8, 0)
        .unwrap_or(Time::MIDNIGHT);

    Ok(SelectionResult {
        date,
        starts_at: PrimitiveDateTime::new(date, time),
        from_time: window.from_time.clone(),
        to_time: window.to_time.clone(),
        slot: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn window(from: &str, to: &str) -> WorkScheduleEntry {
        WorkScheduleEntry {
            provider_id: "p-1".to_string(),
            week_day: "Monday".to_string(),
            from_time: from.to_string(),
            to_time: to.to_string(),
        }
    }

    fn booking(date: &str, label: &str) -> Appointment {
        Appointment {
            appointment_id: "a-1".to_string(),
            provider_id: "p-1".to_string(),
            patient_id: "u-1".to_string(),
            appointment_date: date.to_string(),
            appointment_time: label.to_string(),
            week_day: String::new(),
            status: None,
            visit_type: String::new(),
            insurance: String::new(),
            reason_for_visit: String::new(),
        }
    }

    #[test]
    fn same_day_window_yields_even_quarter_hour_ladder() {
        let slots = generate_slots("09:00 AM", "12:00 PM", 15);
        assert_eq!(slots.len(), 12);
        assert_eq!(slots.first().map(String::as_str), Some("09:00 AM"));
        assert_eq!(slots.last().map(String::as_str), Some("11:45 AM"));
        // Evenly spaced and strictly increasing.
        let minutes: Vec<u32> = slots.iter().map(|s| parse_clock_minutes(s)).collect();
        for pair in minutes.windows(2) {
            assert_eq!(pair[1] - pair[0], 15);
        }
    }

    #[test]
    fn meridiem_crossing_window_resolves_end_twelve_hours_later() {
        // A window stored as "09:00" to "01:00" reads backwards; the end is
        // really one in the afternoon.
        let slots = generate_slots("09:00", "01:00", 15);
        assert_eq!(slots.len(), 16);
        assert_eq!(slots.first().map(String::as_str), Some("09:00 AM"));
        assert_eq!(slots.last().map(String::as_str), Some("12:45 PM"));
        assert!(!slots.iter().any(|s| s == "01:00 PM"));
    }

    #[test]
    fn equal_bounds_mean_a_twelve_hour_day() {
        let slots = generate_slots("09:00 AM", "09:00 AM", 15);
        assert_eq!(slots.len(), 48);
        assert_eq!(slots.last().map(String::as_str), Some("08:45 PM"));
    }

    #[test]
    fn generation_is_pure_and_repeatable() {
        let first = generate_slots("09:00 AM", "05:00 PM", 15);
        let second = generate_slots("09:00 AM", "05:00 PM", 15);
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_clock_components_collapse_to_midnight() {
        // Legacy tolerance: garbage parses as 00:00 rather than failing.
        let slots = generate_slots("junk", "02:00 AM", 30);
        assert_eq!(slots.first().map(String::as_str), Some("12:00 AM"));
        assert_eq!(slots.len(), 4);
    }

    #[test]
    fn no_window_means_no_slots() {
        let schedule = vec![window("09:00 AM", "12:00 PM")];
        // 2024-06-11 is a Tuesday; the schedule only covers Monday.
        assert!(day_slots(&schedule, date!(2024 - 06 - 11), &[]).is_empty());
    }

    #[test]
    fn booked_label_classifies_booked_neighbours_stay_available() {
        let target = date!(2024 - 06 - 10);
        let booked = vec![booking("2024-06-10", "10:00 AM")];

        assert_eq!(classify_slot("10:00 AM", target, &booked), SlotStatus::Booked);
        assert_eq!(
            classify_slot("10:15 AM", target, &booked),
            SlotStatus::Available
        );
        // Same label on a different day does not conflict.
        assert_eq!(
            classify_slot("10:00 AM", date!(2024 - 06 - 17), &booked),
            SlotStatus::Available
        );
    }

    #[test]
    fn day_slots_flags_the_taken_slot() {
        let schedule = vec![window("09:00 AM", "12:00 PM")];
        let booked = vec![booking("2024-06-10", "10:00 AM")];
        let slots = day_slots(&schedule, date!(2024 - 06 - 10), &booked);

        let taken: Vec<&TimeSlot> = slots
            .iter()
            .filter(|s| s.status == SlotStatus::Booked)
            .collect();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].label, "10:00 AM");
    }

    #[test]
    fn selection_moves_and_never_lands_on_booked() {
        let schedule = vec![window("09:00 AM", "12:00 PM")];
        let booked = vec![booking("2024-06-10", "10:00 AM")];
        let mut slots = day_slots(&schedule, date!(2024 - 06 - 10), &booked);

        assert!(mark_selected(&mut slots, "09:30 AM"));
        assert!(mark_selected(&mut slots, "09:45 AM"));
        assert!(!mark_selected(&mut slots, "10:00 AM"));

        let selected: Vec<&TimeSlot> = slots
            .iter()
            .filter(|s| s.status == SlotStatus::Selected)
            .collect();
        assert!(selected.is_empty());
    }

    #[test]
    fn select_slot_rejects_taken_labels_without_side_effects() {
        let entry = window("09:00 AM", "12:00 PM");
        let booked = vec![booking("2024-06-10", "10:00 AM")];

        let rejection = select_slot("10:00 AM", date!(2024 - 06 - 10), &entry, &booked);
        assert_eq!(
            rejection,
            Err(SlotTaken {
                date: date!(2024 - 06 - 10),
                slot: "10:00 AM".to_string(),
            })
        );
    }

    #[test]
    fn select_slot_resolves_afternoon_labels_to_absolute_time() {
        let entry = window("09:00 AM", "05:00 PM");
        let result = select_slot("02:30 PM", date!(2024 - 06 - 10), &entry, &[])
            .expect("slot is free");

        assert_eq!(result.starts_at, datetime!(2024 - 06 - 10 14:30));
        assert_eq!(result.slot, "02:30 PM");
        assert_eq!(result.from_time, "09:00 AM");
        assert_eq!(result.to_time, "05:00 PM");
    }

    #[test]
    fn select_slot_maps_the_midnight_hour_correctly() {
        let entry = window("12:00 AM", "02:00 AM");
        let result = select_slot("12:15 AM", date!(2024 - 06 - 10), &entry, &[])
            .expect("slot is free");
        assert_eq!(result.starts_at, datetime!(2024 - 06 - 10 0:15));
    }
}
