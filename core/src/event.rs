// core/src/event.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Order, OrderId};

/// Emitted by `add_new_order` once the new order is stored.
///
/// The resource only reports the fact; whoever receives it decides whether
/// and how anyone gets notified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPlaced {
  pub order_id: OrderId,
  pub owner: Option<String>,
  pub placed_at: DateTime<Utc>,
}

impl OrderPlaced {
  pub const NOTIFICATION_MESSAGE: &'static str = "Hurray, a new order has just been placed!";

  pub fn for_order(order: &Order) -> Self {
    Self {
      order_id: order.order_id,
      owner: order.user.clone(),
      placed_at: Utc::now(),
    }
  }

  pub fn message(&self) -> &'static str {
    Self::NOTIFICATION_MESSAGE
  }
}
