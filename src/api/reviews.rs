use validator::Validate;

use super::client::{ApiClient, ApiError};
use crate::models::{NewReview, Review};

impl ApiClient {
    /// Reviews for one provider. The platform only exposes an unscoped
    /// listing, so the provider filter is applied on this side.
    pub async fn reviews_for_provider(&self, provider_id: &str) -> Result<Vec<Review>, ApiError> {
        let mut reviews: Vec<Review> = self.get_json("Reviews/GetAllReviews").await?;
        reviews.retain(|review| review.provider_id == provider_id);
        Ok(reviews)
    }

    pub async fn create_review(&self, review: &NewReview) -> Result<(), ApiError> {
        review
            .validate()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        self.post_json("Reviews/CreateReview", review).await
    }
}
