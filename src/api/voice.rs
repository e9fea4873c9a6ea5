use secrecy::SecretString;

use super::client::{ApiClient, ApiError};
use crate::models::RealtimeToken;

impl ApiClient {
    /// Short-lived token for the realtime transcription socket. Lives on a
    /// separate host from the appointment endpoints.
    pub async fn realtime_token(&self, user_id: &str) -> Result<SecretString, ApiError> {
        let path = format!("GetUserToken?userId={user_id}");
        let url = self.voice_url(&path);
        let token: RealtimeToken = self.get_json_at(url, "GetUserToken").await?;
        Ok(SecretString::new(token.token))
    }
}
