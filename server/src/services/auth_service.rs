// server/src/services/auth_service.rs

//! Bearer token verification: resolves an OAuth2 token to the [`Identity`]
//! of the caller.

use crate::config::{AppConfig, AuthMode};
use crate::errors::AppError; // Application-specific error type
use async_trait::async_trait;
use catalog_orders::Identity;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[async_trait]
pub trait TokenVerifier: Send + Sync {
  /// Returns the identity behind `token`, or `AppError::Auth` if it is not acceptable.
  async fn verify(&self, token: &str) -> Result<Identity, AppError>;
}

/// Picks the verifier the configuration asks for.
pub fn verifier_from_config(config: &AppConfig) -> Result<Arc<dyn TokenVerifier>, AppError> {
  Ok(match config.auth_mode {
    AuthMode::Google => Arc::new(GoogleTokenVerifier::new(
      config.google_tokeninfo_url.clone(),
      config.google_client_id.clone(),
    )?),
    AuthMode::Static => Arc::new(StaticTokenVerifier::from_table(&config.static_tokens)),
  })
}

/// Response of Google's tokeninfo endpoint; only the fields we read.
#[derive(Debug, Deserialize)]
struct TokenInfo {
  sub: Option<String>,
  email: Option<String>,
  aud: Option<String>,
  azp: Option<String>,
}

/// Checks tokens against Google's OAuth2 tokeninfo endpoint.
///
/// Access tokens are tried first, then ID tokens. When a client id is
/// configured the token's audience must match it.
pub struct GoogleTokenVerifier {
  http: reqwest::Client,
  tokeninfo_url: String,
  client_id: Option<String>,
}

impl GoogleTokenVerifier {
  pub fn new(tokeninfo_url: String, client_id: Option<String>) -> Result<Self, AppError> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .map_err(|e| AppError::Config(format!("Cannot build token verification client: {}", e)))?;
    Ok(Self {
      http,
      tokeninfo_url,
      client_id,
    })
  }

  async fn lookup(&self, kind: &str, token: &str) -> Result<Option<TokenInfo>, AppError> {
    let response = self
      .http
      .get(&self.tokeninfo_url)
      .query(&[(kind, token)])
      .send()
      .await
      .map_err(|e| AppError::Auth(format!("token verification unavailable: {}", e)))?;

    if !response.status().is_success() {
      debug!(kind, status = %response.status(), "Tokeninfo refused the token.");
      return Ok(None);
    }
    let info = response
      .json::<TokenInfo>()
      .await
      .map_err(|e| AppError::Auth(format!("unreadable token verification response: {}", e)))?;
    Ok(Some(info))
  }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
  #[instrument(name = "auth_service::google_verify", skip(self, token), err(Display))]
  async fn verify(&self, token: &str) -> Result<Identity, AppError> {
    let info = match self.lookup("access_token", token).await? {
      Some(info) => info,
      None => self
        .lookup("id_token", token)
        .await?
        .ok_or_else(|| AppError::Auth("invalid or expired token".to_string()))?,
    };

    if let Some(expected) = &self.client_id {
      let audience_matches = [info.aud.as_deref(), info.azp.as_deref()]
        .into_iter()
        .flatten()
        .any(|aud| aud == expected);
      if !audience_matches {
        warn!("Token was issued for a different client.");
        return Err(AppError::Auth("token audience mismatch".to_string()));
      }
    }

    let subject = info
      .sub
      .or_else(|| info.email.clone())
      .ok_or_else(|| AppError::Auth("token carries no subject".to_string()))?;
    debug!(%subject, "Token verified.");
    Ok(Identity::new(subject, info.email))
  }
}

/// Fixed token table. Intended for development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
  tokens: HashMap<String, Identity>,
}

impl StaticTokenVerifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
    self.tokens.insert(token.into(), identity);
    self
  }

  pub fn from_table(table: &HashMap<String, (String, Option<String>)>) -> Self {
    let tokens = table
      .iter()
      .map(|(token, (subject, email))| (token.clone(), Identity::new(subject.clone(), email.clone())))
      .collect();
    Self { tokens }
  }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
  async fn verify(&self, token: &str) -> Result<Identity, AppError> {
    self
      .tokens
      .get(token)
      .cloned()
      .ok_or_else(|| AppError::Auth("invalid or expired token".to_string()))
  }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
  let (scheme, token) = header_value.trim().split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
