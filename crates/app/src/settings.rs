//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml`, overridden by `QRKOT__<SECTION>__<KEY>`
//! environment variables.
//!
//! See `settings.example.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

/// Account created at startup when missing.
#[derive(Debug, Deserialize)]
pub struct Superuser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Google {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    pub share_with: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub superuser: Option<Superuser>,
    pub google: Option<Google>,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/spreadsheets".to_string(),
        "https://www.googleapis.com/auth/drive".to_string(),
    ]
}

fn default_locale() -> String {
    "en_US".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.database", "memory")?
            .set_default("server.port", 3000)?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("QRKOT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

impl From<Google> for sheets::ServiceAccount {
    fn from(google: Google) -> Self {
        Self {
            client_email: google.client_email,
            private_key: google.private_key,
            private_key_id: google.private_key_id,
            token_uri: google.token_uri,
            scopes: google.scopes,
        }
    }
}
