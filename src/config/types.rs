use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub store_options: StoreOptions,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub print: PrintConfig,
}

/// Server endpoints the workflow talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    /// Address normalization endpoint (full URL).
    #[serde(default = "default_normalization_url")]
    pub address_normalization_url: String,
    /// Label purchase endpoint (full URL).
    #[serde(default = "default_purchase_url")]
    pub purchase_url: String,
}

/// Credentials sent with every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Auth token (nonce). `SHIPPING_LABEL_NONCE` takes precedence.
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Store settings consulted by validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Country the store ships from (e.g., "US").
    #[serde(default = "default_origin_country")]
    pub origin_country: String,
    /// Unit package weights are entered in (e.g., "lbs", "kg").
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    /// Countries whose addresses need a state/province.
    #[serde(default = "default_countries_with_states")]
    pub countries_with_states: Vec<String>,
}

impl StoreOptions {
    pub fn country_has_states(&self, country: &str) -> bool {
        self.countries_with_states
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country))
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Where printed labels end up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_normalization_url() -> String {
    "http://127.0.0.1:8080/wp-json/wc/v1/connect/normalize-address".to_string()
}

fn default_purchase_url() -> String {
    "http://127.0.0.1:8080/wp-json/wc/v1/connect/label/purchase".to_string()
}

fn default_origin_country() -> String {
    "US".to_string()
}

fn default_weight_unit() -> String {
    "lbs".to_string()
}

fn default_countries_with_states() -> Vec<String> {
    ["US", "CA", "AU"].iter().map(|c| c.to_string()).collect()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("labels")
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            address_normalization_url: default_normalization_url(),
            purchase_url: default_purchase_url(),
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            origin_country: default_origin_country(),
            weight_unit: default_weight_unit(),
            countries_with_states: default_countries_with_states(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}
