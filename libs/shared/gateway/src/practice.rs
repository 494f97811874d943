use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl GatewayError {
    /// Message suitable for inline display, preferring whatever the backend
    /// put in its structured error payload.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Upstream { message, .. } => message.clone(),
            GatewayError::Network(e) => e.to_string(),
        }
    }
}

/// Thin client for the practice-management API. One reqwest client, JSON
/// in and out, API key on every request.
pub struct PracticeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PracticeClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.practice_api_url.clone(),
            api_key: config.practice_api_key.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("x-api-key", key);
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self.client.request(method, &url).headers(self.get_headers());

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            let message = extract_error_message(&error_text)
                .unwrap_or_else(|| format!("request failed with status {}", status));

            return Err(GatewayError::Upstream { status, message });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull a human-readable message out of a structured error body. Backends
/// here respond with either {"message": ...} or {"error": ...}.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
