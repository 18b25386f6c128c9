//! Capability traits the workflow depends on.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::error::ServiceError;
use crate::label::{AddressFields, AddressRole};

/// Input of one normalization call.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeRequest {
    pub values: AddressFields,
    pub group: AddressRole,
    pub url: String,
    pub nonce: String,
}

/// Turns a typed address into the carrier's canonical form.
#[async_trait]
pub trait AddressNormalizer: Send + Sync {
    /// Returns the normalized address, or fails when the service is
    /// unreachable or rejects the address.
    async fn normalize(&self, request: NormalizeRequest) -> Result<AddressFields, ServiceError>;
}

/// Input of one "save form" call.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub url: String,
    pub nonce: String,
    pub method: Method,
    pub payload: Value,
}

impl SaveRequest {
    pub fn post(url: String, nonce: String, payload: Value) -> Self {
        Self {
            url,
            nonce,
            method: Method::POST,
            payload,
        }
    }
}

/// Persists a form and returns the server's JSON answer.
///
/// Saving starts when the future is first polled and ends when it
/// resolves; the caller observes both around its own `.await`.
#[async_trait]
pub trait LabelPersistence: Send + Sync {
    async fn save(&self, request: SaveRequest) -> Result<Value, ServiceError>;
}

/// Renders or prints a `data:` URI document.
pub trait DocumentPrinter: Send + Sync {
    fn print(&self, data_uri: &str) -> Result<(), ServiceError>;
}

/// Shows errors to the user.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}
