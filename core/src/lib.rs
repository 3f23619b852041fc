// src/lib.rs

//! catalog_orders: the orders and order-items resource of the art catalog.
//!
//! The crate provides:
//!  - The `Order` / `OrderItem` records with their opaque attribute maps.
//!  - Parsing of the list arguments (`limit`, `offset`, `fields`, `user`).
//!  - A tagged `Outcome` that keeps "order missing", "item missing" and
//!    "rejected input" apart.
//!  - The `ResourceStore` seam and an in-memory implementation.
//!  - `OrdersResource`, the facade the HTTP layer talks to.
//!  - `OrderPlaced`, reported after a new order is stored.

pub mod error;
pub mod event;
pub mod model;
pub mod outcome;
pub mod query;
pub mod resource;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::error::{StoreError, StoreResult};
pub use crate::event::OrderPlaced;
pub use crate::model::{Attributes, Identity, ItemId, Order, OrderId, OrderItem};
pub use crate::outcome::{Missing, Outcome, Rejection, Upserted};
pub use crate::query::{ListFilter, ListQuery, Page, Projection};
pub use crate::resource::{OrderSchema, OrdersResource, Placed, INVALID_UPDATE_REASON};
pub use crate::store::{InMemoryStore, Inserted, Lookup, ResourceStore};
