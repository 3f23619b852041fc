// core/src/store/memory.rs

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{Inserted, Lookup, ResourceStore};
use crate::error::StoreResult;
use crate::model::{ItemId, Order, OrderId, OrderItem};
use crate::outcome::Upserted;
use crate::query::Page;

#[derive(Debug, Clone)]
struct StoredOrder {
  order: Order,
  items: BTreeMap<ItemId, OrderItem>,
}

/// Process-local store backed by ordered maps.
///
/// IMPORTANT: lock guards are taken and released inside each call and are
/// never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
  orders: Arc<RwLock<BTreeMap<OrderId, StoredOrder>>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn order_count(&self) -> usize {
    self.orders.read().len()
  }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
  async fn list_orders(&self, page: &Page, owner: Option<&str>) -> StoreResult<Vec<Order>> {
    let guard = self.orders.read();
    let matching = guard
      .values()
      .filter(|stored| owner.map_or(true, |owner| stored.order.user.as_deref() == Some(owner)))
      .map(|stored| stored.order.clone());
    Ok(page.slice(matching))
  }

  #[instrument(name = "memory_store::insert_order", skip(self, order), fields(order_id = %order.order_id))]
  async fn insert_order(&self, order: Order) -> StoreResult<Inserted> {
    let mut guard = self.orders.write();
    if guard.contains_key(&order.order_id) {
      debug!("Order id already taken.");
      return Ok(Inserted::Duplicate);
    }
    guard.insert(
      order.order_id,
      StoredOrder {
        order,
        items: BTreeMap::new(),
      },
    );
    Ok(Inserted::Stored)
  }

  async fn fetch_order(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
    Ok(self.orders.read().get(&order_id).map(|stored| stored.order.clone()))
  }

  async fn replace_order(&self, order: Order) -> StoreResult<bool> {
    let mut guard = self.orders.write();
    match guard.get_mut(&order.order_id) {
      Some(stored) => {
        stored.order = order;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  #[instrument(name = "memory_store::delete_order", skip(self))]
  async fn delete_order(&self, order_id: OrderId) -> StoreResult<bool> {
    let removed = self.orders.write().remove(&order_id);
    if let Some(stored) = &removed {
      debug!(cascaded_items = stored.items.len(), "Order removed with its items.");
    }
    Ok(removed.is_some())
  }

  async fn list_items(&self, order_id: OrderId, page: &Page) -> StoreResult<Option<Vec<OrderItem>>> {
    let guard = self.orders.read();
    Ok(
      guard
        .get(&order_id)
        .map(|stored| page.slice(stored.items.values().cloned())),
    )
  }

  async fn fetch_item(&self, order_id: OrderId, item_id: ItemId) -> StoreResult<Lookup<OrderItem>> {
    let guard = self.orders.read();
    Ok(match guard.get(&order_id) {
      None => Lookup::OrderMissing,
      Some(stored) => match stored.items.get(&item_id) {
        Some(item) => Lookup::Found(item.clone()),
        None => Lookup::ItemMissing,
      },
    })
  }

  async fn upsert_item(&self, item: OrderItem) -> StoreResult<Lookup<Upserted<OrderItem>>> {
    let mut guard = self.orders.write();
    let Some(stored) = guard.get_mut(&item.order_id) else {
      return Ok(Lookup::OrderMissing);
    };
    let upserted = match stored.items.insert(item.item_id, item.clone()) {
      Some(_) => Upserted::Updated(item),
      None => Upserted::Created(item),
    };
    Ok(Lookup::Found(upserted))
  }

  async fn delete_item(&self, order_id: OrderId, item_id: ItemId) -> StoreResult<Lookup<()>> {
    let mut guard = self.orders.write();
    Ok(match guard.get_mut(&order_id) {
      None => Lookup::OrderMissing,
      Some(stored) => match stored.items.remove(&item_id) {
        Some(_) => Lookup::Found(()),
        None => Lookup::ItemMissing,
      },
    })
  }
}
