/// Configuration management for the Posts service
///
/// This module handles loading and managing configuration from environment
/// variables. OAuth client credentials are externally supplied secrets and
/// are never defaulted.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Google identity-provider settings
    pub google: GoogleConfig,
    /// Datastore settings
    pub datastore: DatastoreConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Google identity-provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// OAuth2 client id; also the expected token audience
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Registered redirect URI for the authorization-code flow
    pub redirect_uri: String,
    /// Published signing-key set endpoint
    pub jwks_uri: String,
}

/// Datastore configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    /// Cloud project that owns the entities
    pub project_id: String,
    /// API base URL; point at an emulator for local runs
    pub base_url: String,
    /// Optional bearer token for the REST API
    pub access_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig {
                host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            google: GoogleConfig {
                client_id: require_env("GOOGLE_CLIENT_ID")?,
                client_secret: require_env("GOOGLE_CLIENT_SECRET")?,
                redirect_uri: require_env("GOOGLE_REDIRECT_URI")?,
                jwks_uri: std::env::var("GOOGLE_JWKS_URI")
                    .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v3/certs".to_string()),
            },
            datastore: DatastoreConfig {
                project_id: require_env("GOOGLE_CLOUD_PROJECT")?,
                base_url: std::env::var("DATASTORE_BASE_URL")
                    .unwrap_or_else(|_| "https://datastore.googleapis.com".to_string()),
                access_token: std::env::var("DATASTORE_ACCESS_TOKEN").ok(),
            },
        })
    }
}

fn require_env(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("{} must be set", key))
}
