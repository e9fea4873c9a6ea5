use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: String,
    pub provider_id: String,
    #[serde(default)]
    pub patient_id: String,
    pub review_text: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    #[validate(length(min = 1, message = "provider id must not be empty"))]
    pub provider_id: String,
    #[validate(length(min = 1, message = "patient id must not be empty"))]
    pub patient_id: String,
    #[validate(length(min = 1, message = "review text must not be empty"))]
    pub review_text: String,
}
