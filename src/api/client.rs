use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{path} returned {status}")]
    Status { path: String, status: StatusCode },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Thin client over the platform's REST endpoints.
///
/// Holds one shared connection pool, the configured base URLs, and the
/// caller's bearer token. Every request carries a v7 uuid correlation id,
/// both as a header and on its tracing span. There is deliberately no retry
/// layer here: a failed fetch is surfaced to the caller as-is.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    voice_base_url: String,
    token: Option<SecretString>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            voice_base_url: config.voice_base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn voice_url(&self, path: &str) -> String {
        format!("{}/{}", self.voice_base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        self.fetch_json(self.http.get(url), path).await
    }

    pub(crate) async fn get_json_at<T: DeserializeOwned>(
        &self,
        url: String,
        path: &str,
    ) -> Result<T, ApiError> {
        self.fetch_json(self.http.get(url), path).await
    }

    pub(crate) async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let url = self.url(path);
        // Creation endpoints answer with a bare status; the body is ignored.
        self.send(self.http.post(url).json(body), path)
            .await
            .map(|_| ())
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, path).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send(
        &self,
        mut request: RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let request_id = Uuid::now_v7();
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let span = info_span!("platform_request", path = %path, request_id = %request_id);
        async move {
            let response = request
                .header("x-request-id", request_id.to_string())
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                warn!(%status, "platform rejected the request");
                return Err(ApiError::Status {
                    path: path.to_string(),
                    status,
                });
            }
            Ok(response)
        }
        .instrument(span)
        .await
    }
}
