// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use catalog_orders::{Attributes, Identity, InMemoryStore, OrderSchema, OrdersResource};
use serde_json::Value;
use std::sync::Arc;
use tracing::Level;

// --- Fixtures ---
pub fn caller() -> Identity {
  Identity::new("google-oauth2|1001", Some("curator@example.com".to_string()))
}

pub fn resource() -> (OrdersResource, InMemoryStore) {
  resource_with_schema(OrderSchema::default())
}

pub fn resource_with_schema(schema: OrderSchema) -> (OrdersResource, InMemoryStore) {
  let store = InMemoryStore::new();
  let resource = OrdersResource::with_schema(Arc::new(store.clone()), schema);
  (resource, store)
}

/// Turns a `json!({...})` literal into an attribute map.
pub fn attrs(value: Value) -> Attributes {
  match value {
    Value::Object(map) => map,
    other => panic!("expected a JSON object, got {}", other),
  }
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
