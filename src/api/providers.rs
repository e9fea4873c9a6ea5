use validator::Validate;

use super::client::{ApiClient, ApiError};
use crate::models::{HealthcareProvider, NewHealthcareProvider};

impl ApiClient {
    /// All providers registered on the platform. The listing endpoint is
    /// unscoped; callers filter or page as needed.
    pub async fn providers(&self) -> Result<Vec<HealthcareProvider>, ApiError> {
        self.get_json("HealthcareProviders/GetAllHealthcareProviders")
            .await
    }

    pub async fn create_provider(
        &self,
        provider: &NewHealthcareProvider,
    ) -> Result<(), ApiError> {
        provider
            .validate()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        self.post_json("HealthcareProviders/CreateHealthcareProvider", provider)
            .await
    }
}
