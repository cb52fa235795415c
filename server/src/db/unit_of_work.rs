// verdant-server/src/db/unit_of_work.rs

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use verdant::models::{NewOrder, PlantId};
use verdant::store::{OrderInsert, StoreResult, UnitOfWork, UnitOfWorkSession};
use verdant::StoreError;

use super::{PgStore, TRANSACTION_ID_CONSTRAINT};

#[async_trait]
impl UnitOfWork for PgStore {
  async fn begin(&self) -> StoreResult<Box<dyn UnitOfWorkSession>> {
    let tx = self.pool().begin().await.map_err(|e| StoreError::backend("uow.begin", e))?;
    Ok(Box::new(PgSession { tx: Some(tx) }))
  }
}

/// One Postgres transaction. Dropping it uncommitted rolls it back.
pub struct PgSession {
  tx: Option<Transaction<'static, Postgres>>,
}

impl PgSession {
  fn tx(&mut self) -> StoreResult<&mut Transaction<'static, Postgres>> {
    self.tx.as_mut().ok_or(StoreError::SessionClosed)
  }
}

fn is_duplicate_transaction(err: &sqlx::Error) -> bool {
  match err {
    sqlx::Error::Database(db_err) => db_err.constraint() == Some(TRANSACTION_ID_CONSTRAINT),
    _ => false,
  }
}

#[async_trait]
impl UnitOfWorkSession for PgSession {
  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<OrderInsert> {
    let id = Uuid::new_v4();
    let tx = self.tx()?;
    let result = sqlx::query(
      "INSERT INTO orders (id, plant_id, transaction_id, customer, status, seller_email, seller_name, seller_image, \
       name, category, quantity, price, image, ordered_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(id)
    .bind(order.plant_id)
    .bind(&order.transaction_id)
    .bind(&order.customer)
    .bind(order.status.as_str())
    .bind(&order.seller.email)
    .bind(&order.seller.name)
    .bind(&order.seller.image)
    .bind(&order.name)
    .bind(&order.category)
    .bind(order.quantity)
    .bind(order.price)
    .bind(&order.image)
    .bind(order.date)
    .execute(&mut **tx)
    .await;

    match result {
      Ok(_) => Ok(OrderInsert::Inserted(id)),
      Err(e) if is_duplicate_transaction(&e) => {
        debug!(transaction_id = %order.transaction_id, "Order insert hit the transaction id constraint.");
        Ok(OrderInsert::DuplicateTransaction)
      }
      Err(e) => Err(StoreError::backend("orders.insert", e)),
    }
  }

  async fn decrement_stock(&mut self, plant_id: PlantId) -> StoreResult<bool> {
    let tx = self.tx()?;
    let result = sqlx::query("UPDATE plants SET quantity = quantity - 1 WHERE id = $1 AND quantity >= 1")
      .bind(plant_id)
      .execute(&mut **tx)
      .await
      .map_err(|e| StoreError::backend("plants.decrement_stock", e))?;
    Ok(result.rows_affected() == 1)
  }

  async fn commit(mut self: Box<Self>) -> StoreResult<()> {
    let tx = self.tx.take().ok_or(StoreError::SessionClosed)?;
    tx.commit().await.map_err(|e| StoreError::backend("uow.commit", e))
  }

  async fn rollback(mut self: Box<Self>) -> StoreResult<()> {
    let tx = self.tx.take().ok_or(StoreError::SessionClosed)?;
    tx.rollback().await.map_err(|e| StoreError::backend("uow.rollback", e))
  }
}
