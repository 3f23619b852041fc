// core/src/model.rs

//! Records managed by the orders resource.
//!
//! Orders and order-items carry an opaque attribute map: the resource never
//! interprets attribute names beyond the identifying keys (`order_id`,
//! `item_id`) and the owning `user`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::query::Projection;

/// Opaque attribute map of an order or an order-item.
pub type Attributes = Map<String, Value>;

pub const ORDER_ID_KEY: &str = "order_id";
pub const ITEM_ID_KEY: &str = "item_id";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for OrderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// The caller of a single request, as resolved by the auth gate.
///
/// Lives exactly as long as the request that produced it and is handed to
/// resource operations explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub subject: String,
  pub email: Option<String>,
}

impl Identity {
  pub fn new(subject: impl Into<String>, email: Option<String>) -> Self {
    Self {
      subject: subject.into(),
      email,
    }
  }

  /// Name recorded as the owner of orders this identity places.
  pub fn owner_label(&self) -> &str {
    self.email.as_deref().unwrap_or(&self.subject)
  }
}

/// Top-level purchase record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub order_id: OrderId,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user: Option<String>,
  #[serde(flatten)]
  pub attributes: Attributes,
}

/// Line item owned by exactly one order, keyed by `(order_id, item_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
  pub order_id: OrderId,
  pub item_id: ItemId,
  #[serde(flatten)]
  pub attributes: Attributes,
}

impl Order {
  /// Flat JSON form: identifying keys and attributes side by side.
  pub fn to_record(&self) -> Attributes {
    let mut record = Attributes::new();
    record.insert(ORDER_ID_KEY.to_string(), Value::from(self.order_id.0));
    if let Some(user) = &self.user {
      record.insert(USER_KEY.to_string(), Value::String(user.clone()));
    }
    for (key, value) in &self.attributes {
      record.insert(key.clone(), value.clone());
    }
    record
  }

  pub fn project(&self, projection: &Projection) -> Value {
    projection.apply(self.to_record())
  }
}

impl OrderItem {
  pub fn to_record(&self) -> Attributes {
    let mut record = Attributes::new();
    record.insert(ORDER_ID_KEY.to_string(), Value::from(self.order_id.0));
    record.insert(ITEM_ID_KEY.to_string(), Value::from(self.item_id.0));
    for (key, value) in &self.attributes {
      record.insert(key.clone(), value.clone());
    }
    record
  }

  pub fn project(&self, projection: &Projection) -> Value {
    projection.apply(self.to_record())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn order_serializes_flat() {
    let mut attributes = Attributes::new();
    attributes.insert("artwork".into(), json!("Water Lilies"));
    let order = Order {
      order_id: OrderId(7),
      user: Some("ada@example.com".into()),
      attributes,
    };

    let value = serde_json::to_value(&order).unwrap();
    assert_eq!(
      value,
      json!({"order_id": 7, "user": "ada@example.com", "artwork": "Water Lilies"})
    );
    assert_eq!(Value::Object(order.to_record()), value);
  }

  #[test]
  fn owner_label_prefers_email() {
    let with_email = Identity::new("1234", Some("ada@example.com".into()));
    let without_email = Identity::new("1234", None);
    assert_eq!(with_email.owner_label(), "ada@example.com");
    assert_eq!(without_email.owner_label(), "1234");
  }
}
