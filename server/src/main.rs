// server/src/main.rs

use catalog_orders::{InMemoryStore, OrderSchema, OrdersResource, ResourceStore};
use catalog_orders_server::db::PgStore;
use catalog_orders_server::services::{auth_service, notifier};
use catalog_orders_server::web::auth::verify_oauth_token;
use catalog_orders_server::web::configure_app_routes;
use catalog_orders_server::{AppConfig, AppError, AppState};

use actix_cors::Cors;
use actix_web::middleware::{from_fn, NormalizePath};
use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting art catalog orders server...");

  let app_state = match build_state().await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialise the application.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  let server_address = app_state.config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(from_fn(verify_oauth_token)) // Innermost: runs after CORS has answered pre-flights
      .wrap(NormalizePath::trim())
      .wrap(Cors::permissive())
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}

async fn build_state() -> Result<AppState, AppError> {
  let config = Arc::new(AppConfig::from_env()?);

  let store: Arc<dyn ResourceStore> = match &config.database_url {
    Some(database_url) => {
      let store = PgStore::connect(database_url).await?;
      store.ensure_schema().await?;
      Arc::new(store)
    }
    None => {
      tracing::warn!("DATABASE_URL not set; orders live in memory and vanish on restart.");
      Arc::new(InMemoryStore::new())
    }
  };

  let schema = OrderSchema {
    required_order_fields: config.required_order_fields.clone(),
    required_item_fields: config.required_item_fields.clone(),
  };
  let resource = OrdersResource::with_schema(store, schema);

  let verifier = auth_service::verifier_from_config(&config)?;
  let sink = notifier::sink_from_config(config.slack_webhook_url.as_deref())?;
  // The worker lives as long as some dispatcher handle does.
  let (dispatcher, _worker) = notifier::NotificationDispatcher::spawn(sink, config.notification_queue_capacity);

  Ok(AppState {
    resource,
    verifier,
    notifier: dispatcher,
    config,
  })
}
