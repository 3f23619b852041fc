// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use catalog_orders::{
  Identity, InMemoryStore, Inserted, ItemId, Lookup, Order, OrderId, OrderItem, OrderSchema, OrdersResource, Page,
  ResourceStore, StoreError, StoreResult, Upserted,
};
use catalog_orders_server::errors::Result as AppResult;
use catalog_orders_server::services::auth_service::StaticTokenVerifier;
use catalog_orders_server::services::notifier::{NotificationDispatcher, NotificationSink};
use catalog_orders_server::{AppConfig, AppState};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Level;

pub const TOKEN: &str = "curator-token";
pub const OTHER_TOKEN: &str = "visitor-token";

/// Forwards every delivered message into a channel the test can read.
pub struct ChannelSink(pub mpsc::UnboundedSender<String>);

#[async_trait]
impl NotificationSink for ChannelSink {
  async fn deliver(&self, message: &str) -> AppResult<()> {
    self.0.send(message.to_string()).ok();
    Ok(())
  }
}

pub fn curator() -> Identity {
  Identity::new("google-oauth2|1001", Some("curator@example.com".to_string()))
}

/// Never finishes a delivery, so the notification queue backs up.
pub struct StuckSink;

#[async_trait]
impl NotificationSink for StuckSink {
  async fn deliver(&self, _message: &str) -> AppResult<()> {
    std::future::pending::<()>().await;
    Ok(())
  }
}

/// Every call fails as if the database were unreachable.
pub struct UnreachableStore;

fn unreachable() -> StoreError {
  anyhow::anyhow!("connection refused").into()
}

#[async_trait]
impl ResourceStore for UnreachableStore {
  async fn list_orders(&self, _page: &Page, _owner: Option<&str>) -> StoreResult<Vec<Order>> {
    Err(unreachable())
  }
  async fn insert_order(&self, _order: Order) -> StoreResult<Inserted> {
    Err(unreachable())
  }
  async fn fetch_order(&self, _order_id: OrderId) -> StoreResult<Option<Order>> {
    Err(unreachable())
  }
  async fn replace_order(&self, _order: Order) -> StoreResult<bool> {
    Err(unreachable())
  }
  async fn delete_order(&self, _order_id: OrderId) -> StoreResult<bool> {
    Err(unreachable())
  }
  async fn list_items(&self, _order_id: OrderId, _page: &Page) -> StoreResult<Option<Vec<OrderItem>>> {
    Err(unreachable())
  }
  async fn fetch_item(&self, _order_id: OrderId, _item_id: ItemId) -> StoreResult<Lookup<OrderItem>> {
    Err(unreachable())
  }
  async fn upsert_item(&self, _item: OrderItem) -> StoreResult<Lookup<Upserted<OrderItem>>> {
    Err(unreachable())
  }
  async fn delete_item(&self, _order_id: OrderId, _item_id: ItemId) -> StoreResult<Lookup<()>> {
    Err(unreachable())
  }
}

/// Application state over the given store and sink. Must be called inside a runtime.
pub fn build_state(
  store: Arc<dyn ResourceStore>,
  schema: OrderSchema,
  sink: Arc<dyn NotificationSink>,
  queue_capacity: usize,
) -> AppState {
  let verifier = StaticTokenVerifier::new()
    .with_token(TOKEN, curator())
    .with_token(OTHER_TOKEN, Identity::new("visitor", None));
  let (notifier, _worker) = NotificationDispatcher::spawn(sink, queue_capacity);
  let config = AppConfig::from_lookup(|_| None).expect("default config");

  AppState {
    resource: OrdersResource::with_schema(store, schema),
    verifier: Arc::new(verifier),
    notifier,
    config: Arc::new(config),
  }
}

/// Fresh in-memory store; delivered notifications arrive on the receiver.
pub fn test_state(schema: OrderSchema) -> (AppState, mpsc::UnboundedReceiver<String>) {
  let (sender, receiver) = mpsc::unbounded_channel();
  let state = build_state(
    Arc::new(InMemoryStore::new()),
    schema,
    Arc::new(ChannelSink(sender)),
    8,
  );
  (state, receiver)
}

pub fn bearer(token: &str) -> (&'static str, String) {
  ("Authorization", format!("Bearer {}", token))
}

/// Builds the service with the same middleware stack as `main`.
#[macro_export]
macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state))
        .wrap(actix_web::middleware::from_fn(
          catalog_orders_server::web::auth::verify_oauth_token,
        ))
        .wrap(actix_web::middleware::NormalizePath::trim())
        .wrap(actix_cors::Cors::permissive())
        .wrap(tracing_actix_web::TracingLogger::default())
        .configure(catalog_orders_server::web::configure_app_routes),
    )
    .await
  };
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
