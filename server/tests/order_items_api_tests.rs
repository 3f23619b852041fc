// tests/order_items_api_tests.rs
#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use catalog_orders::OrderSchema;
use common::*;
use serde_json::{json, Value};

fn place_order(order_id: i64) -> TestRequest {
  TestRequest::post()
    .uri("/api/orders")
    .insert_header(bearer(TOKEN))
    .set_json(json!({"order_id": order_id, "artwork": "Nocturne"}))
}

#[actix_web::test]
async fn test_items_of_unknown_order_are_not_found() {
  setup_tracing();
  let (state, _notifications) = test_state(OrderSchema::default());
  let app = init_app!(state);

  let resp = test::call_service(
    &app,
    TestRequest::get()
      .uri("/api/orders/9999999/orderitems")
      .insert_header(bearer(TOKEN))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"status": "order not found", "result": null}));

  let resp = test::call_service(
    &app,
    TestRequest::put()
      .uri("/api/orders/9999999/orderitems/1")
      .insert_header(bearer(TOKEN))
      .set_json(json!({"frame": "oak"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_put_creates_then_replaces_item() {
  setup_tracing();
  let (state, _notifications) = test_state(OrderSchema::default());
  let app = init_app!(state);
  let resp = test::call_service(&app, place_order(42).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(
    &app,
    TestRequest::put()
      .uri("/api/orders/42/orderitems/1")
      .insert_header(bearer(TOKEN))
      .set_json(json!({"frame": "oak", "quantity": 1}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(
    body["result"],
    json!({"order_id": 42, "item_id": 1, "frame": "oak", "quantity": 1})
  );

  // Ids in the body never override the path.
  let resp = test::call_service(
    &app,
    TestRequest::put()
      .uri("/api/orders/42/orderitems/1/")
      .insert_header(bearer(TOKEN))
      .set_json(json!({"order_id": 7, "item_id": 7, "frame": "walnut"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["result"], json!({"order_id": 42, "item_id": 1, "frame": "walnut"}));

  let resp = test::call_service(
    &app,
    TestRequest::get()
      .uri("/api/orders/42/orderitems?fields=item_id,frame")
      .insert_header(bearer(TOKEN))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["result"], json!([{"item_id": 1, "frame": "walnut"}]));
}

#[actix_web::test]
async fn test_item_lookup_distinguishes_missing_item() {
  setup_tracing();
  let (state, _notifications) = test_state(OrderSchema::default());
  let app = init_app!(state);
  let resp = test::call_service(&app, place_order(5).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(
    &app,
    TestRequest::get()
      .uri("/api/orders/5/orderitems/3")
      .insert_header(bearer(TOKEN))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"status": "item not in specified order", "result": null}));

  let resp = test::call_service(
    &app,
    TestRequest::get()
      .uri("/api/orders/5/orderitems")
      .insert_header(bearer(TOKEN))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"status": "success", "result": []}));
}

#[actix_web::test]
async fn test_item_listing_ignores_user_argument() {
  setup_tracing();
  let (state, _notifications) = test_state(OrderSchema::default());
  let app = init_app!(state);
  let resp = test::call_service(&app, place_order(3).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(
    &app,
    TestRequest::get()
      .uri("/api/orders/3/orderitems?user=")
      .insert_header(bearer(TOKEN))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"status": "success", "result": []}));
}

#[actix_web::test]
async fn test_put_item_missing_required_fields_is_bad_request() {
  setup_tracing();
  let schema = OrderSchema {
    required_order_fields: vec![],
    required_item_fields: vec!["quantity".to_string()],
  };
  let (state, _notifications) = test_state(schema);
  let app = init_app!(state);
  let resp = test::call_service(&app, place_order(8).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(
    &app,
    TestRequest::put()
      .uri("/api/orders/8/orderitems/1")
      .insert_header(bearer(TOKEN))
      .set_json(json!({"frame": "oak"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"status": "missing required fields: quantity", "result": null}));
}

#[actix_web::test]
async fn test_delete_item_and_cascade_on_order_delete() {
  setup_tracing();
  let (state, _notifications) = test_state(OrderSchema::default());
  let app = init_app!(state);
  let resp = test::call_service(&app, place_order(11).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  for item_id in [1, 2] {
    let resp = test::call_service(
      &app,
      TestRequest::put()
        .uri(&format!("/api/orders/11/orderitems/{}", item_id))
        .insert_header(bearer(TOKEN))
        .set_json(json!({"frame": "oak"}))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  let resp = test::call_service(
    &app,
    TestRequest::delete()
      .uri("/api/orders/11/orderitems/1")
      .insert_header(bearer(TOKEN))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  assert!(test::read_body(resp).await.is_empty());

  let resp = test::call_service(
    &app,
    TestRequest::delete()
      .uri("/api/orders/11/orderitems/1")
      .insert_header(bearer(TOKEN))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = test::call_service(
    &app,
    TestRequest::delete()
      .uri("/api/orders/11")
      .insert_header(bearer(TOKEN))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = test::call_service(
    &app,
    TestRequest::get()
      .uri("/api/orders/11/orderitems/2")
      .insert_header(bearer(TOKEN))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "order not found");
}
