// verdant/src/store.rs

//! Storage contracts for the catalog and the order book.
//!
//! Filtered finds return an empty `Vec` when nothing matches; they never fail
//! for zero results. Writes that must land together (the order insert and the
//! stock decrement of a fulfillment) go through a [`UnitOfWork`] session.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{NewOrder, NewPlant, Order, OrderId, Plant, PlantId};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CatalogStore: Send + Sync {
  async fn insert(&self, plant: NewPlant) -> StoreResult<PlantId>;

  async fn find_all(&self) -> StoreResult<Vec<Plant>>;

  async fn find_by_id(&self, id: PlantId) -> StoreResult<Option<Plant>>;

  async fn find_by_seller(&self, seller_email: &str) -> StoreResult<Vec<Plant>>;

  /// Atomically adds `delta` to the plant's quantity. Returns `false` when the
  /// plant does not exist or the result would be negative; nothing changes then.
  async fn adjust_quantity(&self, id: PlantId, delta: i32) -> StoreResult<bool>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn find_by_customer(&self, customer_email: &str) -> StoreResult<Vec<Order>>;

  async fn find_by_seller(&self, seller_email: &str) -> StoreResult<Vec<Order>>;

  async fn find_by_transaction_id(&self, transaction_id: &str) -> StoreResult<Option<Order>>;
}

/// Result of inserting an order inside a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderInsert {
  Inserted(OrderId),
  /// Another order already holds this transaction id.
  DuplicateTransaction,
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
  async fn begin(&self) -> StoreResult<Box<dyn UnitOfWorkSession>>;
}

/// One transaction spanning the order book and the catalog. Dropping a session
/// without committing discards its writes.
#[async_trait]
pub trait UnitOfWorkSession: Send {
  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<OrderInsert>;

  /// Decrements stock by one, refusing to go below zero. Returns `false` when
  /// no unit was available.
  async fn decrement_stock(&mut self, plant_id: PlantId) -> StoreResult<bool>;

  async fn commit(self: Box<Self>) -> StoreResult<()>;

  async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
