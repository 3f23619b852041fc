// server/src/web/auth.rs

//! The auth gate: every request except a CORS pre-flight must carry a
//! verifiable bearer token. The resolved [`Identity`] is stored in the
//! request's extensions and dropped with the request.

use actix_web::body::BoxBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::http::{header, Method};
use actix_web::middleware::Next;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest, ResponseError};
use catalog_orders::Identity;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::services::auth_service::bearer_token;
use crate::state::AppState;

/// Middleware for `actix_web::middleware::from_fn`.
pub async fn verify_oauth_token(
  req: ServiceRequest,
  next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
  if req.method() == Method::OPTIONS {
    return next.call(req).await;
  }

  let Some(app_state) = req.app_data::<web::Data<AppState>>().cloned() else {
    let err = AppError::Internal("application state is not registered".to_string());
    return Ok(req.into_response(err.error_response()));
  };

  let token = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(bearer_token)
    .map(str::to_owned);
  let Some(token) = token else {
    warn!(path = %req.path(), "Request without bearer token.");
    let err = AppError::Auth("missing bearer token".to_string());
    return Ok(req.into_response(err.error_response()));
  };

  match app_state.verifier.verify(&token).await {
    Ok(identity) => {
      debug!(subject = %identity.subject, "Caller authenticated.");
      req.extensions_mut().insert(identity);
      next.call(req).await
    }
    Err(err) => Ok(req.into_response(err.error_response())),
  }
}

/// The caller resolved by [`verify_oauth_token`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let identity = req.extensions().get::<Identity>().cloned();
    futures_util::future::ready(
      identity
        .map(AuthenticatedUser)
        .ok_or_else(|| AppError::Auth("request was not authenticated".to_string())),
    )
  }
}
