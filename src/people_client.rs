use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    AnalyticsSnapshot, CommunicationRecord, ConnectionStatus, MessageRequest, MessageResponse,
    Profile, SearchRequest, SearchResponse,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const PERSON_INFO_PATH: &str = "/person-info";
pub const SEND_MESSAGE_PATH: &str = "/send-message";
pub const ANALYTICS_PATH: &str = "/analytics";
pub const REPORTS_PATH: &str = "/reports";

/// Client for the people lookup backend.
///
/// This is the only component that touches the network. Every call returns a
/// value: lookups and sends yield `Result<_, AppError>` with transport,
/// status and envelope failures folded into [`AppError`], while the
/// background reads fall back to empty defaults.
#[derive(Clone)]
pub struct PeopleApiClient {
    client: reqwest::Client,
    base_url: String,
}

/// Status and decoded body of an arbitrary backend call.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// JSON body, or the raw text as a JSON string when it is not JSON.
    pub body: Value,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl PeopleApiClient {
    /// Creates a new `PeopleApiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend base URL, e.g. `https://host/api`.
    /// * `timeout` - Optional request timeout; `None` keeps the reqwest default.
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            AppError::InternalError(format!("Failed to create people API client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(config.api_base_url.clone(), config.http_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Looks up a person by display name.
    ///
    /// # Returns
    ///
    /// * `Result<Profile, AppError>` - The profile, or the normalized failure.
    pub async fn search_person(&self, name: &str) -> Result<Profile, AppError> {
        let url = self.endpoint(PERSON_INFO_PATH);
        let body = SearchRequest {
            name: name.to_string(),
        };
        tracing::info!("API POST {} (name: {})", url, name);

        let envelope: SearchResponse = self
            .execute("POST", &url, self.client.post(&url).json(&body))
            .await?;

        match envelope {
            SearchResponse {
                success: true,
                data: Some(profile),
                ..
            } => {
                tracing::info!("✓ Profile found: {} ({})", profile.name, profile.id);
                Ok(profile)
            }
            SearchResponse { success: true, .. } => {
                tracing::warn!("Search for '{}' succeeded without a profile", name);
                Err(AppError::Application(
                    "Search returned no profile".to_string(),
                ))
            }
            SearchResponse { error, .. } => {
                let reason = error.unwrap_or_else(|| "Search failed".to_string());
                tracing::warn!("Search for '{}' rejected: {}", name, reason);
                Err(AppError::Application(reason))
            }
        }
    }

    /// Sends a message to a looked-up person.
    ///
    /// # Returns
    ///
    /// * `Result<Option<String>, AppError>` - The backend message id, if any.
    pub async fn send_message(&self, request: &MessageRequest) -> Result<Option<String>, AppError> {
        let url = self.endpoint(SEND_MESSAGE_PATH);
        tracing::info!("API POST {} (profile: {})", url, request.profile_id);

        let envelope: MessageResponse = self
            .execute("POST", &url, self.client.post(&url).json(request))
            .await?;

        if envelope.success {
            tracing::info!(
                "✓ Message sent to profile {} (id: {:?})",
                request.profile_id,
                envelope.message_id
            );
            Ok(envelope.message_id)
        } else {
            let reason = envelope
                .error
                .unwrap_or_else(|| "Failed to send message".to_string());
            tracing::warn!("Message to {} rejected: {}", request.profile_id, reason);
            Err(AppError::Application(reason))
        }
    }

    /// Fetches the aggregate counters. Failures yield zeroed counters.
    pub async fn get_analytics(&self) -> AnalyticsSnapshot {
        let url = self.endpoint(ANALYTICS_PATH);
        tracing::info!("API GET {}", url);

        self.execute("GET", &url, self.json_get(&url))
            .await
            .unwrap_or_default()
    }

    /// Fetches the communication history. Failures, including a body that is
    /// not an array of records, yield an empty list.
    pub async fn get_communications(&self) -> Vec<CommunicationRecord> {
        let url = self.endpoint(REPORTS_PATH);
        tracing::info!("API GET {}", url);

        self.execute("GET", &url, self.json_get(&url))
            .await
            .unwrap_or_default()
    }

    /// Classifies backend reachability with a GET against the reports
    /// endpoint. Only a 2xx answer counts as connected.
    pub async fn check_connection(&self) -> ConnectionStatus {
        let url = self.endpoint(REPORTS_PATH);
        tracing::debug!("Probing backend at {}", url);

        match self.with_json_headers(self.json_get(&url)).send().await {
            Ok(response) if response.status().is_success() => ConnectionStatus::Connected,
            Ok(response) => {
                tracing::warn!("Backend probe returned {}", response.status());
                ConnectionStatus::Disconnected
            }
            Err(e) => {
                tracing::warn!("Backend probe failed: {}", e);
                ConnectionStatus::Disconnected
            }
        }
    }

    /// Issues an arbitrary JSON call and reports status and body without
    /// interpreting either. Used by the API tester.
    pub async fn raw_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, AppError> {
        let url = self.endpoint(path);
        tracing::info!("API {} {} (diagnostic)", method, url);

        let request = self.client.request(method, &url);
        let request = match body {
            Some(body) => request.json(body),
            None => request.header(CONTENT_TYPE, "application/json"),
        };

        let response = self
            .with_json_headers(request)
            .send()
            .await
            .map_err(AppError::from)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(AppError::from)?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(RawResponse { status, body })
    }

    /// A bodiless GET declaring the JSON content type. Calls with a body get
    /// theirs from `RequestBuilder::json`.
    fn json_get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).header(CONTENT_TYPE, "application/json")
    }

    /// Adds the JSON `Accept` header shared by every call.
    fn with_json_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(ACCEPT, "application/json")
    }

    /// Sends a request and decodes a 2xx JSON body into `T`.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T, AppError> {
        let response = self
            .with_json_headers(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("API {} {} Error: {}", method, url, e);
                AppError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("API {} {} Error: status {}", method, url, status);
            return Err(AppError::http(status));
        }

        let text = response.text().await.map_err(|e| {
            tracing::error!("API {} {} Error reading body: {}", method, url, e);
            AppError::Network(e.to_string())
        })?;
        tracing::debug!("API {} {} Response: {}", method, url, text);

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!("API {} {} Error decoding body: {}", method, url, e);
            AppError::Decode(e.to_string())
        })
    }
}
