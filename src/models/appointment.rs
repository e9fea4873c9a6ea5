use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;
use validator::Validate;

const WIRE_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// An existing reservation against a provider, as returned by the platform.
///
/// `appointment_date` arrives either as a bare date or a full ISO timestamp;
/// conflict checks only ever compare at day granularity, via [`Self::date`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default)]
    pub appointment_id: String,
    pub provider_id: String,
    #[serde(default)]
    pub patient_id: String,
    pub appointment_date: String,
    pub appointment_time: String,
    #[serde(default)]
    pub week_day: String,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default, rename = "type")]
    pub visit_type: String,
    #[serde(default)]
    pub insurance: String,
    #[serde(default)]
    pub reason_for_visit: String,
}

impl Appointment {
    /// Calendar day of the reservation, if the wire value parses.
    pub fn date(&self) -> Option<Date> {
        let day = self.appointment_date.get(..10)?;
        Date::parse(day, WIRE_DATE).ok()
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    #[validate(length(min = 1, message = "provider id must not be empty"))]
    pub provider_id: String,
    #[validate(length(min = 1, message = "patient id must not be empty"))]
    pub patient_id: String,
    #[validate(length(min = 1, message = "appointment date must not be empty"))]
    pub appointment_date: String,
    #[validate(length(min = 1, message = "appointment time must not be empty"))]
    pub appointment_time: String,
    pub week_day: String,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub visit_type: String,
    pub insurance: String,
    #[validate(length(min = 1, message = "reason for visit must not be empty"))]
    pub reason_for_visit: String,
}

/// Parse a `YYYY-MM-DD` wire date.
pub fn parse_wire_date(raw: &str) -> Option<Date> {
    Date::parse(raw.get(..10)?, WIRE_DATE).ok()
}

/// Format a date back into the platform's `YYYY-MM-DD` wire form.
pub fn format_wire_date(date: Date) -> String {
    date.format(WIRE_DATE)
        .unwrap_or_else(|_| date.to_string())
}
