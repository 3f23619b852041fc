// server/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::collections::HashMap;
use std::env;

pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// How bearer tokens are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
  /// Ask Google's tokeninfo endpoint.
  Google,
  /// Fixed token table, for development and tests.
  Static,
}

#[derive(Debug, Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Absent means the in-memory store.
  pub database_url: Option<String>,

  pub auth_mode: AuthMode,
  pub google_client_id: Option<String>,
  pub google_tokeninfo_url: String,
  /// token -> (subject, email)
  pub static_tokens: HashMap<String, (String, Option<String>)>,

  /// Absent means notifications are only logged.
  pub slack_webhook_url: Option<String>,
  pub notification_queue_capacity: usize,

  pub required_order_fields: Vec<String>,
  pub required_item_fields: Vec<String>,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` feeds it the process environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_env = |var_name: &str| lookup(var_name).filter(|value| !value.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|| "5000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL");

    let auth_mode = match get_env("AUTH_MODE").as_deref().map(str::to_ascii_lowercase).as_deref() {
      None | Some("google") => AuthMode::Google,
      Some("static") => AuthMode::Static,
      Some(other) => return Err(AppError::Config(format!("Invalid AUTH_MODE '{}'", other))),
    };
    let google_client_id = get_env("GOOGLE_CLIENT_ID");
    let google_tokeninfo_url = get_env("GOOGLE_TOKENINFO_URL").unwrap_or_else(|| DEFAULT_TOKENINFO_URL.to_string());
    let static_tokens = match get_env("STATIC_TOKENS") {
      Some(raw) => parse_static_tokens(&raw)?,
      None => HashMap::new(),
    };
    if auth_mode == AuthMode::Static && static_tokens.is_empty() {
      return Err(AppError::Config(
        "AUTH_MODE=static requires at least one STATIC_TOKENS entry".to_string(),
      ));
    }

    let slack_webhook_url = get_env("SLACK_WEBHOOK_URL");
    let notification_queue_capacity = get_env("NOTIFICATION_QUEUE_CAPACITY")
      .unwrap_or_else(|| "64".to_string())
      .parse::<usize>()
      .ok()
      .filter(|capacity| *capacity > 0)
      .ok_or_else(|| AppError::Config("Invalid NOTIFICATION_QUEUE_CAPACITY: expected a positive integer".to_string()))?;

    let required_order_fields = get_env("ORDER_REQUIRED_FIELDS").map(|raw| split_list(&raw)).unwrap_or_default();
    let required_item_fields = get_env("ITEM_REQUIRED_FIELDS").map(|raw| split_list(&raw)).unwrap_or_default();

    tracing::info!("Application configuration loaded successfully.");
    // Tokens and webhook URLs are secrets; only their presence is logged.
    tracing::debug!(
      %server_host,
      server_port,
      database = database_url.is_some(),
      ?auth_mode,
      slack = slack_webhook_url.is_some(),
      "Loaded config details"
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      auth_mode,
      google_client_id,
      google_tokeninfo_url,
      static_tokens,
      slack_webhook_url,
      notification_queue_capacity,
      required_order_fields,
      required_item_fields,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn split_list(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .map(String::from)
    .collect()
}

/// `token=subject[:email]` entries separated by commas.
fn parse_static_tokens(raw: &str) -> Result<HashMap<String, (String, Option<String>)>> {
  let mut tokens = HashMap::new();
  for entry in split_list(raw) {
    let (token, who) = entry
      .split_once('=')
      .ok_or_else(|| AppError::Config(format!("Invalid STATIC_TOKENS entry '{}'", entry)))?;
    let (subject, email) = match who.split_once(':') {
      Some((subject, email)) => (subject.trim(), Some(email.trim().to_string())),
      None => (who.trim(), None),
    };
    if token.trim().is_empty() || subject.is_empty() {
      return Err(AppError::Config(format!("Invalid STATIC_TOKENS entry '{}'", entry)));
    }
    tokens.insert(token.trim().to_string(), (subject.to_string(), email));
  }
  Ok(tokens)
}
