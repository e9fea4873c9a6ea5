use super::client::{ApiClient, ApiError};
use crate::models::WorkScheduleEntry;

impl ApiClient {
    /// The provider's recurring weekly work schedule, one entry per covered
    /// weekday. Read-only from this side; maintained by the provider's own
    /// tooling.
    pub async fn work_schedule(
        &self,
        provider_id: &str,
    ) -> Result<Vec<WorkScheduleEntry>, ApiError> {
        self.get_json(&format!(
            "ProvidersWorkSchedule/GetWorkScheduleByProviderId/{provider_id}"
        ))
        .await
    }
}
