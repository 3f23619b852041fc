// core/src/store/mod.rs

//! The persistence seam for orders and order-items.
//!
//! Stores answer questions about existence with plain values (`Option`,
//! `bool`, [`Lookup`]) and reserve `Err` for backend faults.

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{ItemId, Order, OrderId, OrderItem};
use crate::outcome::Upserted;
use crate::query::Page;

pub use memory::InMemoryStore;

/// Result of addressing an item through its parent order.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
  Found(T),
  OrderMissing,
  ItemMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
  Stored,
  Duplicate,
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
  /// Orders in ascending `order_id`, restricted to `owner` when given.
  async fn list_orders(&self, page: &Page, owner: Option<&str>) -> StoreResult<Vec<Order>>;

  async fn insert_order(&self, order: Order) -> StoreResult<Inserted>;

  async fn fetch_order(&self, order_id: OrderId) -> StoreResult<Option<Order>>;

  /// Overwrites a stored order. Returns `false` when there is nothing to overwrite.
  async fn replace_order(&self, order: Order) -> StoreResult<bool>;

  /// Removes the order and every item it owns.
  async fn delete_order(&self, order_id: OrderId) -> StoreResult<bool>;

  /// Items in ascending `item_id`; `None` when the order does not exist.
  async fn list_items(&self, order_id: OrderId, page: &Page) -> StoreResult<Option<Vec<OrderItem>>>;

  async fn fetch_item(&self, order_id: OrderId, item_id: ItemId) -> StoreResult<Lookup<OrderItem>>;

  /// Creates the item, or replaces it when `(order_id, item_id)` is taken.
  /// Never yields `ItemMissing`.
  async fn upsert_item(&self, item: OrderItem) -> StoreResult<Lookup<Upserted<OrderItem>>>;

  async fn delete_item(&self, order_id: OrderId, item_id: ItemId) -> StoreResult<Lookup<()>>;
}
