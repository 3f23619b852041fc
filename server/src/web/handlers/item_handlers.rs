// server/src/web/handlers/item_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::Value;
use tracing::instrument;

use catalog_orders::model::{ITEM_ID_KEY, ORDER_ID_KEY};
use catalog_orders::{Attributes, ItemId, ListQuery, OrderId, Upserted};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::envelope::{done_or_respond, respond_no_content, respond_success};

#[instrument(name = "handler::list_items", skip(app_state, path, query), fields(order_id = %path.as_ref()))]
pub async fn list_items_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
  let order_id = OrderId(path.into_inner());
  let outcome = app_state
    .resource
    .retrieve_all_items_in_given_order(order_id, &query)
    .await?;
  Ok(match done_or_respond(outcome) {
    Ok(items) => respond_success(StatusCode::OK, items),
    Err(response) => response,
  })
}

#[instrument(name = "handler::get_item", skip(app_state, path))]
pub async fn get_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
  let (order_id, item_id) = path.into_inner();
  let outcome = app_state
    .resource
    .retrieve_single_item_in_given_order(OrderId(order_id), ItemId(item_id))
    .await?;
  Ok(match done_or_respond(outcome) {
    Ok(item) => respond_success(StatusCode::OK, item),
    Err(response) => response,
  })
}

/// Creates the item (201) or replaces it (200). The ids always come from the path.
#[instrument(name = "handler::put_item", skip(app_state, path, body))]
pub async fn put_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(i64, i64)>,
  body: web::Json<Attributes>,
) -> Result<HttpResponse, AppError> {
  let (order_id, item_id) = path.into_inner();
  let mut order_info = body.into_inner();
  order_info.insert(ORDER_ID_KEY.to_string(), Value::from(order_id));
  order_info.insert(ITEM_ID_KEY.to_string(), Value::from(item_id));

  let outcome = app_state.resource.add_item_to_order(order_info).await?;
  Ok(match done_or_respond(outcome) {
    Ok(Upserted::Created(item)) => respond_success(StatusCode::CREATED, item),
    Ok(Upserted::Updated(item)) => respond_success(StatusCode::OK, item),
    Err(response) => response,
  })
}

#[instrument(name = "handler::delete_item", skip(app_state, path))]
pub async fn delete_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
  let (order_id, item_id) = path.into_inner();
  let outcome = app_state
    .resource
    .remove_item_from_order(OrderId(order_id), ItemId(item_id))
    .await?;
  Ok(match done_or_respond(outcome) {
    Ok(_) => respond_no_content(),
    Err(response) => response,
  })
}
