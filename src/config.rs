use anyhow::{Context, Result};
use secrecy::SecretString;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub voice_base_url: String,
    pub timeout: Duration,
    /// Bearer token obtained from the external identity provider, if any.
    pub token: Option<SecretString>,
}

#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub realtime_url: String,
    pub sample_rate: u32,
    pub max_reconnects: u32,
    pub reconnect_delay: Duration,
    pub ping_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Platform API configuration
        let base_url = env::var("PYSKE_API_BASE_URL")
            .unwrap_or_else(|_| "https://pyskedev.azurewebsites.net/api".to_string());

        let voice_base_url = env::var("PYSKE_VOICE_BASE_URL")
            .unwrap_or_else(|_| "https://careappsstg.azurewebsites.net/api/voice".to_string());

        let timeout_secs = env::var("PYSKE_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("Failed to parse PYSKE_API_TIMEOUT_SECS")?;

        let token = env::var("PYSKE_API_TOKEN").ok().map(SecretString::new);

        // Realtime transcription configuration
        let realtime_url = env::var("VOICE_REALTIME_URL")
            .unwrap_or_else(|_| "wss://api.assemblyai.com/v2/realtime/ws".to_string());

        let sample_rate = env::var("VOICE_SAMPLE_RATE")
            .unwrap_or_else(|_| "16000".to_string())
            .parse::<u32>()
            .context("Failed to parse VOICE_SAMPLE_RATE")?;

        let max_reconnects = env::var("VOICE_MAX_RECONNECTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("Failed to parse VOICE_MAX_RECONNECTS")?;

        let reconnect_delay_ms = env::var("VOICE_RECONNECT_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u64>()
            .context("Failed to parse VOICE_RECONNECT_DELAY_MS")?;

        let ping_interval_secs = env::var("VOICE_PING_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("Failed to parse VOICE_PING_INTERVAL_SECS")?;

        Ok(Config {
            api: ApiConfig {
                base_url,
                voice_base_url,
                timeout: Duration::from_secs(timeout_secs),
                token,
            },
            voice: VoiceConfig {
                realtime_url,
                sample_rate,
                max_reconnects,
                reconnect_delay: Duration::from_millis(reconnect_delay_ms),
                ping_interval: Duration::from_secs(ping_interval_secs),
            },
        })
    }
}
