use validator::Validate;

use super::client::{ApiClient, ApiError};
use crate::models::{Appointment, NewAppointment, WorkScheduleEntry};

/// Schedule and bookings for one provider, fetched together.
///
/// The two fetches are independent, so this is an eventually-consistent
/// snapshot: a slot computed as available from it may be booked by another
/// client before a booking is submitted. The create call is the
/// serialization point where that race surfaces.
#[derive(Debug, Clone)]
pub struct AvailabilitySnapshot {
    pub schedule: Vec<WorkScheduleEntry>,
    pub booked: Vec<Appointment>,
}

impl ApiClient {
    /// Existing reservations for the provider, across all dates; the
    /// availability engine narrows them to the selected day.
    pub async fn appointments(&self, provider_id: &str) -> Result<Vec<Appointment>, ApiError> {
        self.get_json(&format!(
            "ProvidersAppointment/GetProvidersAppointmentByProviderId/{provider_id}"
        ))
        .await
    }

    pub async fn availability_snapshot(
        &self,
        provider_id: &str,
    ) -> Result<AvailabilitySnapshot, ApiError> {
        let (schedule, booked) = tokio::try_join!(
            self.work_schedule(provider_id),
            self.appointments(provider_id)
        )?;
        Ok(AvailabilitySnapshot { schedule, booked })
    }

    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<(), ApiError> {
        appointment
            .validate()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        self.post_json(
            "ProvidersAppointment/CreateProvidersAppointment",
            appointment,
        )
        .await
    }
}
