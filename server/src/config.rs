// verdant-server/src/config.rs

use std::env;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dotenvy::dotenv;

use crate::errors::{AppError, Result};

pub const DEFAULT_FIREBASE_JWKS_URL: &str =
  "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub run_migrations: bool,

  /// Storefront frontend origin: the only CORS origin and the base of the
  /// checkout redirect URLs.
  pub client_domain: String,
  pub checkout_currency: String,

  pub stripe_secret_key: String,
  pub stripe_api_base: String,

  pub firebase_project_id: String,
  pub firebase_jwks_url: String,

  pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &"[REDACTED]")
      .field("db_max_connections", &self.db_max_connections)
      .field("run_migrations", &self.run_migrations)
      .field("client_domain", &self.client_domain)
      .field("checkout_currency", &self.checkout_currency)
      .field("stripe_secret_key", &"[REDACTED]")
      .field("stripe_api_base", &self.stripe_api_base)
      .field("firebase_project_id", &self.firebase_project_id)
      .field("firebase_jwks_url", &self.firebase_jwks_url)
      .field("log_format", &self.log_format)
      .finish()
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("PORT")
      .or_else(|_| get_env("SERVER_PORT"))
      .unwrap_or_else(|_| "3000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let db_max_connections = get_env("DB_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "5".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?;
    let run_migrations = get_env("RUN_MIGRATIONS")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    let client_domain = get_env("CLIENT_DOMAIN")?.trim_end_matches('/').to_string();
    let checkout_currency = get_env("CHECKOUT_CURRENCY")
      .unwrap_or_else(|_| "usd".to_string())
      .to_lowercase();

    let stripe_secret_key = get_env("STRIPE_SECRET_KEY")?;
    let stripe_api_base = get_env("STRIPE_API_BASE")
      .unwrap_or_else(|_| "https://api.stripe.com".to_string())
      .trim_end_matches('/')
      .to_string();

    let firebase_project_id = match get_env("FIREBASE_PROJECT_ID") {
      Ok(project_id) => project_id,
      Err(_) => project_id_from_service_key(&get_env("FB_SERVICE_KEY").map_err(|_| {
        AppError::Config("Either FIREBASE_PROJECT_ID or FB_SERVICE_KEY must be set".to_string())
      })?)?,
    };
    let firebase_jwks_url = get_env("FIREBASE_JWKS_URL").unwrap_or_else(|_| DEFAULT_FIREBASE_JWKS_URL.to_string());

    let log_format = match get_env("LOG_FORMAT").as_deref() {
      Ok("json") => LogFormat::Json,
      Ok("pretty") | Err(_) => LogFormat::Pretty,
      Ok(other) => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected json or pretty", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      run_migrations,
      client_domain,
      checkout_currency,
      stripe_secret_key,
      stripe_api_base,
      firebase_project_id,
      firebase_jwks_url,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

/// Reads `project_id` out of a base64-encoded service account JSON document.
pub fn project_id_from_service_key(encoded: &str) -> Result<String> {
  let raw = STANDARD
    .decode(encoded.trim())
    .map_err(|e| AppError::Config(format!("FB_SERVICE_KEY is not valid base64: {}", e)))?;
  let document: serde_json::Value = serde_json::from_slice(&raw)
    .map_err(|e| AppError::Config(format!("FB_SERVICE_KEY is not a JSON document: {}", e)))?;
  document
    .get("project_id")
    .and_then(serde_json::Value::as_str)
    .filter(|id| !id.is_empty())
    .map(str::to_string)
    .ok_or_else(|| AppError::Config("FB_SERVICE_KEY has no project_id".to_string()))
}
