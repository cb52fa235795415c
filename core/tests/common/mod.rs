// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::Level;
use uuid::Uuid;

use verdant::models::{Order, Plant, Seller};
use verdant::payment::{CheckoutSession, CheckoutSessionRequest, CreatedSession, PaymentStatus, SessionMetadata};
use verdant::store::{CatalogStore, OrderStore, StoreResult, UnitOfWork, UnitOfWorkSession};
use verdant::{CheckoutBackends, CheckoutSettings, GatewayError, MemoryStore, PaymentGateway};

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixtures ---

pub fn seller() -> Seller {
  Seller {
    email: "grower@example.com".to_string(),
    name: "Green Grower".to_string(),
    image: None,
  }
}

pub fn plant(name: &str, quantity: i32, price: Decimal) -> Plant {
  Plant {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: format!("A healthy {}", name.to_lowercase()),
    category: "Indoor".to_string(),
    price,
    quantity,
    image: format!("https://img.example/{}.png", name.to_lowercase()),
    seller: seller(),
  }
}

pub fn session(id: &str, status: PaymentStatus, plant_id: &str, payment_intent: Option<&str>, amount: i64) -> CheckoutSession {
  CheckoutSession {
    id: id.to_string(),
    payment_status: status,
    amount_total_minor: Some(amount),
    payment_intent: payment_intent.map(str::to_string),
    metadata: SessionMetadata {
      plant_id: plant_id.to_string(),
      customer: "buyer@example.com".to_string(),
    },
  }
}

pub fn paid_session(id: &str, plant: &Plant, payment_intent: &str, amount: i64) -> CheckoutSession {
  session(id, PaymentStatus::Paid, &plant.id.to_string(), Some(payment_intent), amount)
}

pub fn settings() -> CheckoutSettings {
  CheckoutSettings {
    client_domain: "https://shop.example".to_string(),
    currency: "usd".to_string(),
  }
}

pub fn backends(store: &MemoryStore, gateway: Arc<ScriptedGateway>) -> CheckoutBackends {
  let store = Arc::new(store.clone());
  CheckoutBackends {
    catalog: store.clone(),
    orders: store.clone(),
    unit_of_work: store,
    gateway,
  }
}

// --- Scripted payment gateway ---

/// Serves pre-registered sessions and records every session it is asked to create.
#[derive(Default)]
pub struct ScriptedGateway {
  sessions: Mutex<HashMap<String, CheckoutSession>>,
  created: Mutex<Vec<CheckoutSessionRequest>>,
  pub retrievals: AtomicUsize,
}

impl ScriptedGateway {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn with_session(session: CheckoutSession) -> Arc<Self> {
    let gateway = Self::default();
    gateway.sessions.lock().insert(session.id.clone(), session);
    Arc::new(gateway)
  }

  pub fn put_session(&self, session: CheckoutSession) {
    self.sessions.lock().insert(session.id.clone(), session);
  }

  pub fn created_requests(&self) -> Vec<CheckoutSessionRequest> {
    self.created.lock().clone()
  }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
  async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CreatedSession, GatewayError> {
    let mut created = self.created.lock();
    created.push(request);
    let id = format!("cs_test_{}", created.len());
    Ok(CreatedSession {
      url: format!("https://checkout.stripe.test/c/pay/{}", id),
      id,
    })
  }

  async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GatewayError> {
    self.retrievals.fetch_add(1, Ordering::SeqCst);
    self
      .sessions
      .lock()
      .get(session_id)
      .cloned()
      .ok_or_else(|| GatewayError::SessionNotFound {
        session_id: session_id.to_string(),
      })
  }
}

// --- Store wrappers that simulate concurrent writers ---

/// Reports "no order" for the first transaction lookup, as a concurrent
/// fulfillment that has not committed yet would look.
pub struct StaleFirstLookup {
  pub inner: MemoryStore,
  served_stale: AtomicBool,
}

impl StaleFirstLookup {
  pub fn new(inner: MemoryStore) -> Self {
    Self {
      inner,
      served_stale: AtomicBool::new(false),
    }
  }
}

#[async_trait]
impl OrderStore for StaleFirstLookup {
  async fn find_by_customer(&self, customer_email: &str) -> StoreResult<Vec<Order>> {
    self.inner.find_by_customer(customer_email).await
  }

  async fn find_by_seller(&self, seller_email: &str) -> StoreResult<Vec<Order>> {
    OrderStore::find_by_seller(&self.inner, seller_email).await
  }

  async fn find_by_transaction_id(&self, transaction_id: &str) -> StoreResult<Option<Order>> {
    if !self.served_stale.swap(true, Ordering::SeqCst) {
      return Ok(None);
    }
    self.inner.find_by_transaction_id(transaction_id).await
  }
}

/// Sells out `plant_id` just before handing out a session, as if another
/// buyer took the last unit between the stock check and the write.
pub struct SellOutOnBegin {
  pub inner: MemoryStore,
  pub plant_id: Uuid,
}

#[async_trait]
impl UnitOfWork for SellOutOnBegin {
  async fn begin(&self) -> StoreResult<Box<dyn UnitOfWorkSession>> {
    if let Some(plant) = self.inner.plant(self.plant_id) {
      CatalogStore::adjust_quantity(&self.inner, self.plant_id, -plant.quantity).await?;
    }
    self.inner.begin().await
  }
}
