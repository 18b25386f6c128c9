mod loader;
mod types;

pub use loader::{ConfigError, NONCE_ENV_VAR};
pub use types::{AuthConfig, Config, Endpoints, HttpConfig, PrintConfig, StoreOptions};
