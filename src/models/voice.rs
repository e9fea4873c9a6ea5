use serde::Deserialize;

/// Short-lived token for the realtime transcription websocket. The voice
/// endpoint is a legacy .NET service and capitalizes the field name.
#[derive(Debug, Deserialize)]
pub struct RealtimeToken {
    #[serde(rename = "Token")]
    pub token: String,
}
