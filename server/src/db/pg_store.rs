// server/src/db/pg_store.rs

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info, instrument};

use catalog_orders::{
  Attributes, Inserted, ItemId, Lookup, Order, OrderId, OrderItem, Page, ResourceStore, StoreError, StoreResult, Upserted,
};

const CREATE_ORDERS: &str = "CREATE TABLE IF NOT EXISTS art_orders (
  order_id BIGINT PRIMARY KEY,
  owner TEXT NULL,
  attributes JSONB NOT NULL DEFAULT '{}'::jsonb
)";

const CREATE_ORDER_ITEMS: &str = "CREATE TABLE IF NOT EXISTS art_order_items (
  order_id BIGINT NOT NULL REFERENCES art_orders (order_id) ON DELETE CASCADE,
  item_id BIGINT NOT NULL,
  attributes JSONB NOT NULL DEFAULT '{}'::jsonb,
  PRIMARY KEY (order_id, item_id)
)";

#[derive(Debug, FromRow)]
struct OrderRow {
  order_id: i64,
  owner: Option<String>,
  attributes: Json<Attributes>,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
  order_id: i64,
  item_id: i64,
  attributes: Json<Attributes>,
}

impl From<OrderRow> for Order {
  fn from(row: OrderRow) -> Self {
    Order {
      order_id: OrderId(row.order_id),
      user: row.owner,
      attributes: row.attributes.0,
    }
  }
}

impl From<OrderItemRow> for OrderItem {
  fn from(row: OrderItemRow) -> Self {
    OrderItem {
      order_id: OrderId(row.order_id),
      item_id: ItemId(row.item_id),
      attributes: row.attributes.0,
    }
  }
}

fn backend(err: sqlx::Error) -> StoreError {
  anyhow::Error::new(err).into()
}

/// `LIMIT NULL` means no limit in Postgres.
fn sql_window(page: &Page) -> (Option<i64>, i64) {
  (
    page.limit.map(|limit| i64::try_from(limit).unwrap_or(i64::MAX)),
    i64::try_from(page.offset).unwrap_or(i64::MAX),
  )
}

/// Resource store over two tables: `art_orders` and `art_order_items`.
/// Items are removed with their order by the foreign key.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
    let pool = PgPool::connect(database_url).await?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  #[instrument(name = "pg_store::ensure_schema", skip(self), err(Display))]
  pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_ORDERS).execute(&self.pool).await?;
    sqlx::query(CREATE_ORDER_ITEMS).execute(&self.pool).await?;
    debug!("Order tables present.");
    Ok(())
  }

  async fn order_exists(&self, order_id: OrderId) -> StoreResult<bool> {
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM art_orders WHERE order_id = $1)")
      .bind(order_id.0)
      .fetch_one(&self.pool)
      .await
      .map_err(backend)?;
    Ok(exists)
  }
}

#[async_trait]
impl ResourceStore for PgStore {
  async fn list_orders(&self, page: &Page, owner: Option<&str>) -> StoreResult<Vec<Order>> {
    let (limit, offset) = sql_window(page);
    let rows: Vec<OrderRow> = sqlx::query_as(
      "SELECT order_id, owner, attributes FROM art_orders
       WHERE ($1::TEXT IS NULL OR owner = $1)
       ORDER BY order_id ASC LIMIT $2 OFFSET $3",
    )
    .bind(owner)
    .bind(limit)
    .bind(offset)
    .fetch_all(&self.pool)
    .await
    .map_err(backend)?;
    Ok(rows.into_iter().map(Order::from).collect())
  }

  async fn insert_order(&self, order: Order) -> StoreResult<Inserted> {
    let result = sqlx::query(
      "INSERT INTO art_orders (order_id, owner, attributes) VALUES ($1, $2, $3)
       ON CONFLICT (order_id) DO NOTHING",
    )
    .bind(order.order_id.0)
    .bind(order.user)
    .bind(Json(order.attributes))
    .execute(&self.pool)
    .await
    .map_err(backend)?;
    Ok(if result.rows_affected() == 0 {
      Inserted::Duplicate
    } else {
      Inserted::Stored
    })
  }

  async fn fetch_order(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as("SELECT order_id, owner, attributes FROM art_orders WHERE order_id = $1")
      .bind(order_id.0)
      .fetch_optional(&self.pool)
      .await
      .map_err(backend)?;
    Ok(row.map(Order::from))
  }

  async fn replace_order(&self, order: Order) -> StoreResult<bool> {
    let result = sqlx::query("UPDATE art_orders SET owner = $2, attributes = $3 WHERE order_id = $1")
      .bind(order.order_id.0)
      .bind(order.user)
      .bind(Json(order.attributes))
      .execute(&self.pool)
      .await
      .map_err(backend)?;
    Ok(result.rows_affected() > 0)
  }

  async fn delete_order(&self, order_id: OrderId) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM art_orders WHERE order_id = $1")
      .bind(order_id.0)
      .execute(&self.pool)
      .await
      .map_err(backend)?;
    Ok(result.rows_affected() > 0)
  }

  async fn list_items(&self, order_id: OrderId, page: &Page) -> StoreResult<Option<Vec<OrderItem>>> {
    if !self.order_exists(order_id).await? {
      return Ok(None);
    }
    let (limit, offset) = sql_window(page);
    let rows: Vec<OrderItemRow> = sqlx::query_as(
      "SELECT order_id, item_id, attributes FROM art_order_items
       WHERE order_id = $1 ORDER BY item_id ASC LIMIT $2 OFFSET $3",
    )
    .bind(order_id.0)
    .bind(limit)
    .bind(offset)
    .fetch_all(&self.pool)
    .await
    .map_err(backend)?;
    Ok(Some(rows.into_iter().map(OrderItem::from).collect()))
  }

  async fn fetch_item(&self, order_id: OrderId, item_id: ItemId) -> StoreResult<Lookup<OrderItem>> {
    let row: Option<OrderItemRow> = sqlx::query_as(
      "SELECT order_id, item_id, attributes FROM art_order_items WHERE order_id = $1 AND item_id = $2",
    )
    .bind(order_id.0)
    .bind(item_id.0)
    .fetch_optional(&self.pool)
    .await
    .map_err(backend)?;

    Ok(match row {
      Some(row) => Lookup::Found(row.into()),
      None => {
        if self.order_exists(order_id).await? {
          Lookup::ItemMissing
        } else {
          Lookup::OrderMissing
        }
      }
    })
  }

  #[instrument(name = "pg_store::upsert_item", skip(self, item), fields(order_id = %item.order_id, item_id = %item.item_id))]
  async fn upsert_item(&self, item: OrderItem) -> StoreResult<Lookup<Upserted<OrderItem>>> {
    let mut tx = self.pool.begin().await.map_err(backend)?;

    // Lock the parent row so it cannot vanish before the item lands.
    let parent: Option<(i64,)> = sqlx::query_as("SELECT order_id FROM art_orders WHERE order_id = $1 FOR SHARE")
      .bind(item.order_id.0)
      .fetch_optional(&mut *tx)
      .await
      .map_err(backend)?;
    if parent.is_none() {
      tx.rollback().await.map_err(backend)?;
      return Ok(Lookup::OrderMissing);
    }

    // xmax is zero only for a freshly inserted row version.
    let (inserted,): (bool,) = sqlx::query_as(
      "INSERT INTO art_order_items (order_id, item_id, attributes) VALUES ($1, $2, $3)
       ON CONFLICT (order_id, item_id) DO UPDATE SET attributes = EXCLUDED.attributes
       RETURNING (xmax = 0)",
    )
    .bind(item.order_id.0)
    .bind(item.item_id.0)
    .bind(Json(&item.attributes))
    .fetch_one(&mut *tx)
    .await
    .map_err(backend)?;
    tx.commit().await.map_err(backend)?;

    Ok(Lookup::Found(if inserted {
      Upserted::Created(item)
    } else {
      Upserted::Updated(item)
    }))
  }

  async fn delete_item(&self, order_id: OrderId, item_id: ItemId) -> StoreResult<Lookup<()>> {
    let result = sqlx::query("DELETE FROM art_order_items WHERE order_id = $1 AND item_id = $2")
      .bind(order_id.0)
      .bind(item_id.0)
      .execute(&self.pool)
      .await
      .map_err(backend)?;

    Ok(if result.rows_affected() > 0 {
      Lookup::Found(())
    } else if self.order_exists(order_id).await? {
      Lookup::ItemMissing
    } else {
      Lookup::OrderMissing
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn window_maps_absent_limit_to_null() {
    assert_eq!(sql_window(&Page::default()), (None, 0));
    assert_eq!(sql_window(&Page { limit: Some(5), offset: 10 }), (Some(5), 10));
    assert_eq!(sql_window(&Page { limit: Some(u64::MAX), offset: 0 }), (Some(i64::MAX), 0));
  }
}
