// server/src/web/handlers/order_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use catalog_orders::{Attributes, ListQuery, OrderId};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;
use crate::web::envelope::{done_or_respond, respond_no_content, respond_success};

pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("Hello World")
}

#[instrument(name = "handler::list_orders", skip(app_state, query))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state.resource.retrieve_all_orders(&query).await?;
  Ok(match done_or_respond(outcome) {
    Ok(orders) => respond_success(StatusCode::OK, orders),
    Err(response) => response,
  })
}

/// Creates the order and, once it is stored, queues the new-order notification.
#[instrument(
    name = "handler::create_order",
    skip(app_state, auth_user, body),
    fields(caller = %auth_user.0.subject)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  body: web::Json<Attributes>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state.resource.add_new_order(body.into_inner(), &auth_user.0).await?;
  let placed = match done_or_respond(outcome) {
    Ok(placed) => placed,
    Err(response) => return Ok(response),
  };

  let response = respond_success(StatusCode::OK, &placed.order);
  let queued = app_state.notifier.dispatch(placed.event);
  info!(order_id = %placed.order.order_id, queued, "Order placed.");
  Ok(response)
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order_id = OrderId(path.into_inner());
  let outcome = app_state.resource.retrieve_single_order(order_id).await?;
  Ok(match done_or_respond(outcome) {
    Ok(order) => respond_success(StatusCode::OK, order),
    Err(response) => response,
  })
}

#[instrument(name = "handler::update_order", skip(app_state, path, body), fields(order_id = %path.as_ref()))]
pub async fn update_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  body: web::Json<Attributes>,
) -> Result<HttpResponse, AppError> {
  let order_id = OrderId(path.into_inner());
  let outcome = app_state
    .resource
    .update_existing_order(order_id, body.into_inner())
    .await?;
  Ok(match done_or_respond(outcome) {
    Ok(order) => respond_success(StatusCode::OK, order),
    Err(response) => response,
  })
}

#[instrument(name = "handler::delete_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn delete_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order_id = OrderId(path.into_inner());
  let outcome = app_state.resource.remove_order_by_id(order_id).await?;
  Ok(match done_or_respond(outcome) {
    Ok(_) => respond_no_content(),
    Err(response) => response,
  })
}
