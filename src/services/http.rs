//! HTTP implementations of the normalization and persistence capabilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value};

use super::error::ServiceError;
use super::traits::{AddressNormalizer, LabelPersistence, NormalizeRequest, SaveRequest};
use crate::config::HttpConfig;
use crate::label::AddressFields;

/// Header carrying the auth token.
pub const NONCE_HEADER: &str = "X-WP-Nonce";

/// Builds the shared HTTP client from the `[http]` config section.
pub fn build_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
        .build()
}

/// Normalizer calling the store's address normalization endpoint.
#[derive(Debug, Clone)]
pub struct HttpNormalizer {
    client: Client,
}

impl HttpNormalizer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AddressNormalizer for HttpNormalizer {
    async fn normalize(&self, request: NormalizeRequest) -> Result<AddressFields, ServiceError> {
        let body = json!({
            "address": request.values,
            "type": request.group,
        });
        let response =
            send_json(&self.client, Method::POST, &request.url, &request.nonce, &body).await?;

        match response.get("normalized") {
            Some(Value::Object(fields)) => Ok(fields
                .iter()
                .map(|(name, value)| (name.clone(), field_text(value)))
                .collect()),
            _ => Err(ServiceError::Malformed(
                "normalization response has no normalized address".to_string(),
            )),
        }
    }
}

/// Persistence posting forms as JSON.
#[derive(Debug, Clone)]
pub struct HttpPersistence {
    client: Client,
}

impl HttpPersistence {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LabelPersistence for HttpPersistence {
    async fn save(&self, request: SaveRequest) -> Result<Value, ServiceError> {
        send_json(
            &self.client,
            request.method,
            &request.url,
            &request.nonce,
            &request.payload,
        )
        .await
    }
}

async fn send_json(
    client: &Client,
    method: Method,
    url: &str,
    nonce: &str,
    body: &Value,
) -> Result<Value, ServiceError> {
    let transport = |source| ServiceError::Transport {
        url: url.to_string(),
        source,
    };

    tracing::debug!(method = %method, url = %url, "Sending request");
    let response = client
        .request(method, url)
        .header(NONCE_HEADER, nonce)
        .json(body)
        .send()
        .await
        .map_err(transport)?;

    let status = response.status();
    let text = response.text().await.map_err(transport)?;
    let parsed = if text.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(&text)
    };

    if !status.is_success() {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or(text);
        tracing::warn!(status = %status, url = %url, "Request failed");
        return Err(ServiceError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let body = parsed.map_err(|err| ServiceError::Malformed(err.to_string()))?;
    if let Some(message) = error_message(&body) {
        return Err(ServiceError::Rejected(message));
    }
    Ok(body)
}

/// The `error` member of a response body: a string, or an object with a
/// `message`.
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(error) => Some(
            error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| Value::Object(error.clone()).to_string()),
        ),
        other => Some(other.to_string()),
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
