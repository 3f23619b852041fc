// server/src/web/routes.rs

use actix_web::web;

use crate::errors::AppError;
use crate::web::handlers::{item_handlers, order_handlers};

/// Extractor failures answer with the same envelope as everything else.
fn configure_extractors(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(
      web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("invalid JSON body: {}", err)).into()),
    )
    .app_data(
      web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("invalid query string: {}", err)).into()),
    )
    // Non-integer ids do not name a resource at all.
    .app_data(web::PathConfig::default().error_handler(|_err, _req| AppError::NotFound("resource not found".to_string()).into()));
}

// This function will be called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  configure_extractors(cfg);

  cfg
    .route("/", web::get().to(order_handlers::health_check_handler))
    .service(
      web::scope("/api/orders")
        .route("", web::get().to(order_handlers::list_orders_handler))
        .route("", web::post().to(order_handlers::create_order_handler))
        .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
        .route("/{order_id}", web::put().to(order_handlers::update_order_handler))
        .route("/{order_id}", web::delete().to(order_handlers::delete_order_handler))
        .route("/{order_id}/orderitems", web::get().to(item_handlers::list_items_handler))
        .route("/{order_id}/orderitems/{item_id}", web::get().to(item_handlers::get_item_handler))
        .route("/{order_id}/orderitems/{item_id}", web::put().to(item_handlers::put_item_handler))
        .route("/{order_id}/orderitems/{item_id}", web::delete().to(item_handlers::delete_item_handler)),
    );
}
