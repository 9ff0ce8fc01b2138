use crate::config::ProviderConfig;
use crate::domain::model::CleanupSettings;
use crate::domain::ports::CleanupClient;
use crate::utils::error::{ProviderError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

const CLEANUP_PATH: &str = "/app/rest/server/cleanup";

/// REST client for a TeamCity server.
#[derive(Debug, Clone)]
pub struct TeamCityClient {
    client: Client,
    base_url: String,
    basic_auth: Option<(String, String)>,
}

impl TeamCityClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ProviderError::InvalidConfigValueError {
                    field: "token".to_string(),
                    value: "<redacted>".to_string(),
                    reason: e.to_string(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let basic_auth = match (&config.token, &config.username, &config.password) {
            (None, Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        };

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            basic_auth,
        })
    }

    fn cleanup_url(&self) -> String {
        format!("{}{}", self.base_url, CLEANUP_PATH)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.basic_auth {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        }
    }

    async fn parse_settings(response: Response) -> Result<CleanupSettings> {
        let status = response.status();
        tracing::debug!("TeamCity response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CleanupClient for TeamCityClient {
    async fn read_cleanup_settings(&self) -> Result<CleanupSettings> {
        let url = self.cleanup_url();
        tracing::debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        Self::parse_settings(response).await
    }

    async fn write_cleanup_settings(&self, settings: &CleanupSettings) -> Result<CleanupSettings> {
        let url = self.cleanup_url();
        tracing::debug!("PUT {}", url);

        let response = self
            .authorize(self.client.put(&url))
            .json(settings)
            .send()
            .await?;
        Self::parse_settings(response).await
    }
}
