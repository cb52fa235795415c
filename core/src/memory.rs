// verdant/src/memory.rs

//! In-process implementation of every store contract.
//!
//! Backs the test suites and local experiments. Writes made through a
//! [`UnitOfWorkSession`] are applied immediately and undone on rollback (or
//! drop), so other readers can observe them before commit. The uniqueness of
//! `transaction_id` and the non-negative stock rule are enforced the same way
//! the Postgres schema enforces them.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{NewOrder, NewPlant, Order, OrderId, Plant, PlantId};
use crate::store::{CatalogStore, OrderInsert, OrderStore, StoreResult, UnitOfWork, UnitOfWorkSession};

#[derive(Debug, Default)]
struct Tables {
  plants: Vec<Plant>,
  orders: Vec<Order>,
}

impl Tables {
  fn plant_mut(&mut self, id: PlantId) -> Option<&mut Plant> {
    self.plants.iter_mut().find(|p| p.id == id)
  }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_plants(plants: impl IntoIterator<Item = Plant>) -> Self {
    let store = Self::new();
    store.tables.lock().plants.extend(plants);
    store
  }

  pub fn plant(&self, id: PlantId) -> Option<Plant> {
    self.tables.lock().plants.iter().find(|p| p.id == id).cloned()
  }

  pub fn orders(&self) -> Vec<Order> {
    self.tables.lock().orders.clone()
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn insert(&self, plant: NewPlant) -> StoreResult<PlantId> {
    let id = Uuid::new_v4();
    self.tables.lock().plants.push(plant.into_plant(id));
    Ok(id)
  }

  async fn find_all(&self) -> StoreResult<Vec<Plant>> {
    Ok(self.tables.lock().plants.clone())
  }

  async fn find_by_id(&self, id: PlantId) -> StoreResult<Option<Plant>> {
    Ok(self.plant(id))
  }

  async fn find_by_seller(&self, seller_email: &str) -> StoreResult<Vec<Plant>> {
    let tables = self.tables.lock();
    Ok(tables.plants.iter().filter(|p| p.seller.email == seller_email).cloned().collect())
  }

  async fn adjust_quantity(&self, id: PlantId, delta: i32) -> StoreResult<bool> {
    let mut tables = self.tables.lock();
    let Some(plant) = tables.plant_mut(id) else {
      return Ok(false);
    };
    match plant.quantity.checked_add(delta) {
      Some(next) if next >= 0 => {
        plant.quantity = next;
        Ok(true)
      }
      _ => Ok(false),
    }
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn find_by_customer(&self, customer_email: &str) -> StoreResult<Vec<Order>> {
    let tables = self.tables.lock();
    Ok(tables.orders.iter().filter(|o| o.customer == customer_email).cloned().collect())
  }

  async fn find_by_seller(&self, seller_email: &str) -> StoreResult<Vec<Order>> {
    let tables = self.tables.lock();
    Ok(tables.orders.iter().filter(|o| o.seller.email == seller_email).cloned().collect())
  }

  async fn find_by_transaction_id(&self, transaction_id: &str) -> StoreResult<Option<Order>> {
    let tables = self.tables.lock();
    Ok(tables.orders.iter().find(|o| o.transaction_id == transaction_id).cloned())
  }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
  async fn begin(&self) -> StoreResult<Box<dyn UnitOfWorkSession>> {
    Ok(Box::new(MemorySession {
      tables: Arc::clone(&self.tables),
      undo: Vec::new(),
      finished: false,
    }))
  }
}

#[derive(Debug)]
enum Undo {
  RemoveOrder(OrderId),
  RestoreUnit(PlantId),
}

struct MemorySession {
  tables: Arc<Mutex<Tables>>,
  undo: Vec<Undo>,
  finished: bool,
}

impl MemorySession {
  fn ensure_open(&self) -> StoreResult<()> {
    if self.finished {
      return Err(StoreError::SessionClosed);
    }
    Ok(())
  }

  fn revert(&mut self) {
    let mut tables = self.tables.lock();
    while let Some(step) = self.undo.pop() {
      match step {
        Undo::RemoveOrder(id) => tables.orders.retain(|o| o.id != id),
        Undo::RestoreUnit(plant_id) => {
          if let Some(plant) = tables.plant_mut(plant_id) {
            plant.quantity += 1;
          }
        }
      }
    }
  }
}

#[async_trait]
impl UnitOfWorkSession for MemorySession {
  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<OrderInsert> {
    self.ensure_open()?;
    let mut tables = self.tables.lock();
    if tables.orders.iter().any(|o| o.transaction_id == order.transaction_id) {
      return Ok(OrderInsert::DuplicateTransaction);
    }
    let id = Uuid::new_v4();
    tables.orders.push(order.clone().into_order(id));
    self.undo.push(Undo::RemoveOrder(id));
    Ok(OrderInsert::Inserted(id))
  }

  async fn decrement_stock(&mut self, plant_id: PlantId) -> StoreResult<bool> {
    self.ensure_open()?;
    let mut tables = self.tables.lock();
    match tables.plant_mut(plant_id) {
      Some(plant) if plant.quantity >= 1 => {
        plant.quantity -= 1;
        self.undo.push(Undo::RestoreUnit(plant_id));
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  async fn commit(mut self: Box<Self>) -> StoreResult<()> {
    self.ensure_open()?;
    self.undo.clear();
    self.finished = true;
    Ok(())
  }

  async fn rollback(mut self: Box<Self>) -> StoreResult<()> {
    self.ensure_open()?;
    self.revert();
    self.finished = true;
    Ok(())
  }
}

impl Drop for MemorySession {
  fn drop(&mut self) {
    if !self.finished {
      self.revert();
    }
  }
}
