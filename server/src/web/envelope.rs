// server/src/web/envelope.rs

//! The `{"status": ..., "result": ...}` wrapper every API response uses, and
//! the mapping from resource outcomes to HTTP status codes.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

use catalog_orders::Outcome;

pub const SUCCESS: &str = "success";

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
  pub status: String,
  pub result: Option<T>,
}

pub fn respond_success<T: Serialize>(status: StatusCode, payload: T) -> HttpResponse {
  HttpResponse::build(status).json(Envelope {
    status: SUCCESS.to_string(),
    result: Some(payload),
  })
}

pub fn respond_failure(status: StatusCode, reason: &str) -> HttpResponse {
  HttpResponse::build(status).json(Envelope::<()> {
    status: reason.to_string(),
    result: None,
  })
}

/// 204 carries no body at all.
pub fn respond_no_content() -> HttpResponse {
  HttpResponse::NoContent().finish()
}

/// Shapes the failure arms of an outcome; `Done` is left to the caller since
/// its status depends on the verb.
pub fn done_or_respond<T>(outcome: Outcome<T>) -> Result<T, HttpResponse> {
  match outcome {
    Outcome::Done(value) => Ok(value),
    Outcome::Missing(missing) => Err(respond_failure(StatusCode::NOT_FOUND, missing.reason())),
    Outcome::Rejected(rejection) => Err(respond_failure(StatusCode::BAD_REQUEST, rejection.reason())),
  }
}
