use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthcareProvider {
    pub provider_id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub experience_years: i32,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub rating_count: i64,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Creation payload for the provider-onboarding endpoint. The platform
/// accepts the full profile in one shot; most fields are free-form text.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthcareProvider {
    pub provider_id: String,
    pub user_id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub gender: String,
    pub date_of_birth: String,
    pub qualification: String,
    pub experience_years: String,
    pub bio: String,
    pub profile_image_url: String,
    pub languages_spoken: String,
    pub services_offered: String,
    pub working_hours: String,
    pub insurance_accepted: String,
    pub affiliations: String,
    pub verification_id: String,
    pub average_rating: String,
    pub rating_count: String,
    #[validate(email(message = "contact email must be a valid address"))]
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub is_active: bool,
}
