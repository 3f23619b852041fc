// core/src/resource.rs

//! The orders resource: retrieve / add / update / remove for orders and the
//! items nested under them.
//!
//! Each operation resolves to an [`Outcome`]; only store faults surface as
//! `Err`.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreResult;
use crate::event::OrderPlaced;
use crate::model::{Attributes, Identity, ItemId, Order, OrderId, OrderItem, ITEM_ID_KEY, ORDER_ID_KEY, USER_KEY};
use crate::outcome::{Missing, Outcome, Rejection, Upserted};
use crate::query::ListQuery;
use crate::store::{Inserted, Lookup, ResourceStore};

pub const INVALID_UPDATE_REASON: &str = "attempt at updating invalid parameters";

/// Attribute names that must be present when records are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSchema {
  pub required_order_fields: Vec<String>,
  pub required_item_fields: Vec<String>,
}

/// A stored order together with the event announcing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
  pub order: Order,
  pub event: OrderPlaced,
}

#[derive(Clone)]
pub struct OrdersResource {
  store: Arc<dyn ResourceStore>,
  schema: OrderSchema,
}

impl OrdersResource {
  pub fn new(store: Arc<dyn ResourceStore>) -> Self {
    Self::with_schema(store, OrderSchema::default())
  }

  pub fn with_schema(store: Arc<dyn ResourceStore>, schema: OrderSchema) -> Self {
    Self { store, schema }
  }

  #[instrument(name = "orders_resource::retrieve_all_orders", skip(self), err(Display))]
  pub async fn retrieve_all_orders(&self, query: &ListQuery) -> StoreResult<Outcome<Vec<Value>>> {
    let filter = match query.parse() {
      Ok(filter) => filter,
      Err(rejection) => {
        debug!(reason = %rejection, "Rejected order listing arguments.");
        return Ok(rejection.into());
      }
    };

    let orders = self.store.list_orders(&filter.page, filter.owner.as_deref()).await?;
    debug!(count = orders.len(), "Orders listed.");
    Ok(Outcome::Done(
      orders.iter().map(|order| order.project(&filter.projection)).collect(),
    ))
  }

  #[instrument(name = "orders_resource::add_new_order", skip(self, order_base_info), fields(caller = %identity.owner_label()), err(Display))]
  pub async fn add_new_order(&self, mut order_base_info: Attributes, identity: &Identity) -> StoreResult<Outcome<Placed>> {
    let order_id = match take_id(&mut order_base_info, ORDER_ID_KEY) {
      Ok(id) => OrderId(id),
      Err(rejection) => return Ok(rejection.into()),
    };

    let user = match order_base_info.remove(USER_KEY) {
      None | Some(Value::Null) => identity.owner_label().to_string(),
      Some(Value::String(user)) if !user.trim().is_empty() => user.trim().to_string(),
      Some(_) => return Ok(Outcome::rejected("invalid user: expected a non-empty string")),
    };

    if let Err(rejection) = require_fields(&order_base_info, &self.schema.required_order_fields) {
      return Ok(rejection.into());
    }

    let order = Order {
      order_id,
      user: Some(user),
      attributes: order_base_info,
    };

    match self.store.insert_order(order.clone()).await? {
      Inserted::Stored => {
        info!(%order_id, "New order stored.");
        let event = OrderPlaced::for_order(&order);
        Ok(Outcome::Done(Placed { order, event }))
      }
      Inserted::Duplicate => {
        warn!(%order_id, "Order id already in use.");
        Ok(Outcome::rejected(format!("order {} already exists", order_id)))
      }
    }
  }

  #[instrument(name = "orders_resource::retrieve_single_order", skip(self), err(Display))]
  pub async fn retrieve_single_order(&self, order_id: OrderId) -> StoreResult<Outcome<Order>> {
    Ok(match self.store.fetch_order(order_id).await? {
      Some(order) => Outcome::Done(order),
      None => Outcome::Missing(Missing::Order),
    })
  }

  /// Merges `updated_order_information` into the stored order.
  ///
  /// Only attributes the order already has (and `user`) may be touched;
  /// `order_id` may be repeated but not changed.
  #[instrument(name = "orders_resource::update_existing_order", skip(self, updated_order_information), err(Display))]
  pub async fn update_existing_order(
    &self,
    order_id: OrderId,
    updated_order_information: Attributes,
  ) -> StoreResult<Outcome<Order>> {
    let Some(mut order) = self.store.fetch_order(order_id).await? else {
      return Ok(Outcome::Missing(Missing::Order));
    };

    if updated_order_information.is_empty() {
      return Ok(Outcome::rejected(INVALID_UPDATE_REASON));
    }

    for (key, value) in updated_order_information {
      match key.as_str() {
        ORDER_ID_KEY => {
          if value.as_i64() != Some(order_id.0) {
            debug!("Update tried to change order_id.");
            return Ok(Outcome::rejected(INVALID_UPDATE_REASON));
          }
        }
        USER_KEY => match value {
          Value::String(user) if !user.trim().is_empty() => order.user = Some(user.trim().to_string()),
          _ => return Ok(Outcome::rejected(INVALID_UPDATE_REASON)),
        },
        _ => match order.attributes.get_mut(&key) {
          Some(slot) => *slot = value,
          None => {
            debug!(attribute = %key, "Update names an unknown attribute.");
            return Ok(Outcome::rejected(INVALID_UPDATE_REASON));
          }
        },
      }
    }

    if !self.store.replace_order(order.clone()).await? {
      // Deleted between the read and the write.
      return Ok(Outcome::Missing(Missing::Order));
    }
    info!(%order_id, "Order updated.");
    Ok(Outcome::Done(order))
  }

  #[instrument(name = "orders_resource::remove_order_by_id", skip(self), err(Display))]
  pub async fn remove_order_by_id(&self, order_id: OrderId) -> StoreResult<Outcome<OrderId>> {
    if self.store.delete_order(order_id).await? {
      info!(%order_id, "Order removed.");
      Ok(Outcome::Done(order_id))
    } else {
      Ok(Outcome::Missing(Missing::Order))
    }
  }

  #[instrument(name = "orders_resource::retrieve_all_items_in_given_order", skip(self), err(Display))]
  pub async fn retrieve_all_items_in_given_order(
    &self,
    order_id: OrderId,
    query: &ListQuery,
  ) -> StoreResult<Outcome<Vec<Value>>> {
    // Items have no owner; a `user` argument is not even validated.
    let query = ListQuery {
      user: None,
      ..query.clone()
    };
    let filter = match query.parse() {
      Ok(filter) => filter,
      Err(rejection) => return Ok(rejection.into()),
    };

    Ok(match self.store.list_items(order_id, &filter.page).await? {
      Some(items) => Outcome::Done(items.iter().map(|item| item.project(&filter.projection)).collect()),
      None => Outcome::Missing(Missing::Order),
    })
  }

  #[instrument(name = "orders_resource::retrieve_single_item_in_given_order", skip(self), err(Display))]
  pub async fn retrieve_single_item_in_given_order(
    &self,
    order_id: OrderId,
    item_id: ItemId,
  ) -> StoreResult<Outcome<OrderItem>> {
    Ok(from_lookup(self.store.fetch_item(order_id, item_id).await?))
  }

  /// Creates or replaces the item addressed by the `order_id` / `item_id`
  /// keys of `order_info`.
  #[instrument(name = "orders_resource::add_item_to_order", skip(self, order_info), err(Display))]
  pub async fn add_item_to_order(&self, mut order_info: Attributes) -> StoreResult<Outcome<Upserted<OrderItem>>> {
    let (order_id, item_id) = match (take_id(&mut order_info, ORDER_ID_KEY), take_id(&mut order_info, ITEM_ID_KEY)) {
      (Ok(order_id), Ok(item_id)) => (OrderId(order_id), ItemId(item_id)),
      (Err(rejection), _) | (_, Err(rejection)) => return Ok(rejection.into()),
    };

    if let Err(rejection) = require_fields(&order_info, &self.schema.required_item_fields) {
      // An absent parent still wins over an incomplete body.
      if self.store.fetch_order(order_id).await?.is_none() {
        return Ok(Outcome::Missing(Missing::Order));
      }
      return Ok(rejection.into());
    }

    let item = OrderItem {
      order_id,
      item_id,
      attributes: order_info,
    };
    let outcome = from_lookup(self.store.upsert_item(item).await?);
    if let Outcome::Done(upserted) = &outcome {
      info!(%order_id, %item_id, created = upserted.created(), "Order item written.");
    }
    Ok(outcome)
  }

  #[instrument(name = "orders_resource::remove_item_from_order", skip(self), err(Display))]
  pub async fn remove_item_from_order(
    &self,
    order_id: OrderId,
    item_id: ItemId,
  ) -> StoreResult<Outcome<(OrderId, ItemId)>> {
    Ok(from_lookup(self.store.delete_item(order_id, item_id).await?).map(|()| (order_id, item_id)))
  }
}

fn from_lookup<T>(lookup: Lookup<T>) -> Outcome<T> {
  match lookup {
    Lookup::Found(value) => Outcome::Done(value),
    Lookup::OrderMissing => Outcome::Missing(Missing::Order),
    Lookup::ItemMissing => Outcome::Missing(Missing::Item),
  }
}

fn take_id(attributes: &mut Attributes, key: &str) -> Result<i64, Rejection> {
  match attributes.remove(key) {
    None | Some(Value::Null) => Err(Rejection::new(format!("missing required field '{}'", key))),
    Some(value) => value
      .as_i64()
      .ok_or_else(|| Rejection::new(format!("invalid {}: expected an integer, got {}", key, value))),
  }
}

fn require_fields(attributes: &Attributes, required: &[String]) -> Result<(), Rejection> {
  let missing: Vec<&str> = required
    .iter()
    .filter(|name| attributes.get(name.as_str()).map_or(true, Value::is_null))
    .map(String::as_str)
    .collect();
  if missing.is_empty() {
    Ok(())
  } else {
    Err(Rejection::new(format!("missing required fields: {}", missing.join(", "))))
  }
}
