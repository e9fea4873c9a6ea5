//! Availability engine: turns a provider's recurring weekly work schedule
//! plus a snapshot of existing bookings into a concrete list of selectable
//! time slots for one calendar date, and refuses selection of taken slots.
//!
//! Everything here is pure computation over data the caller has already
//! fetched. Missing schedule windows and booking conflicts are ordinary
//! return variants, never errors: the caller renders them as disabled
//! state. Schedule and booking data are fetched independently, so a slot
//! computed as available may be taken by another client before a booking is
//! submitted; the create call is where that race surfaces.

mod schedule;
mod slots;

pub use schedule::{is_date_selectable, parse_weekday, selectable_weekdays, window_for_date};
pub use slots::{
    classify_slot, day_slots, generate_slots, mark_selected, select_slot, SelectionResult,
    SlotStatus, SlotTaken, TimeSlot, DEFAULT_GRANULARITY_MINUTES,
};
