// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use verdant::models::{Plant, Seller};
use verdant::payment::{CheckoutSession, CheckoutSessionRequest, CreatedSession, PaymentStatus, SessionMetadata};
use verdant::{
  CheckoutBackends, CheckoutSettings, GatewayError, IdentityError, IdentityVerifier, MemoryStore, PaymentGateway,
  Storefront, VerifiedCaller,
};
use verdant_server::config::AppConfig;
use verdant_server::state::AppState;

pub const ALICE: &str = "alice@example.com";
pub const ALICE_TOKEN: &str = "token-alice";
pub const BOB: &str = "bob@example.com";
pub const BOB_TOKEN: &str = "token-bob";

/// Accepts a fixed set of opaque tokens.
pub struct StaticVerifier {
  tokens: HashMap<String, String>,
}

impl StaticVerifier {
  pub fn new() -> Self {
    let tokens = [(ALICE_TOKEN, ALICE), (BOB_TOKEN, BOB)]
      .into_iter()
      .map(|(t, e)| (t.to_string(), e.to_string()))
      .collect();
    Self { tokens }
  }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
  async fn verify(&self, bearer_token: &str) -> Result<VerifiedCaller, IdentityError> {
    self
      .tokens
      .get(bearer_token)
      .map(|email| VerifiedCaller { email: email.clone() })
      .ok_or_else(|| IdentityError::Rejected("unknown token".to_string()))
  }
}

#[derive(Default)]
pub struct FakeGateway {
  sessions: Mutex<HashMap<String, CheckoutSession>>,
  created: Mutex<Vec<CheckoutSessionRequest>>,
}

impl FakeGateway {
  pub fn put_session(&self, session: CheckoutSession) {
    self.sessions.lock().unwrap().insert(session.id.clone(), session);
  }

  pub fn created_requests(&self) -> Vec<CheckoutSessionRequest> {
    self.created.lock().unwrap().clone()
  }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
  async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CreatedSession, GatewayError> {
    let mut created = self.created.lock().unwrap();
    created.push(request);
    let id = format!("cs_test_{}", created.len());
    Ok(CreatedSession {
      url: format!("https://checkout.stripe.test/c/pay/{}", id),
      id,
    })
  }

  async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GatewayError> {
    self
      .sessions
      .lock()
      .unwrap()
      .get(session_id)
      .cloned()
      .ok_or_else(|| GatewayError::SessionNotFound {
        session_id: session_id.to_string(),
      })
  }
}

pub fn test_config() -> AppConfig {
  let vars: HashMap<&str, &str> = [
    ("DATABASE_URL", "postgres://localhost/verdant_test"),
    ("CLIENT_DOMAIN", "https://shop.example"),
    ("STRIPE_SECRET_KEY", "sk_test_123"),
    ("FIREBASE_PROJECT_ID", "verdant-test"),
  ]
  .into_iter()
  .collect();
  AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap()
}

pub fn test_state(store: &MemoryStore, gateway: Arc<FakeGateway>) -> AppState {
  let config = Arc::new(test_config());
  let shared = Arc::new(store.clone());
  let backends = CheckoutBackends {
    catalog: shared.clone(),
    orders: shared.clone(),
    unit_of_work: shared,
    gateway,
  };
  let settings = CheckoutSettings {
    client_domain: config.client_domain.clone(),
    currency: config.checkout_currency.clone(),
  };
  AppState {
    storefront: Arc::new(Storefront::new(backends, settings)),
    identity: Arc::new(StaticVerifier::new()),
    config,
  }
}

pub fn plant_of(seller_email: &str, name: &str, quantity: i32) -> Plant {
  Plant {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: String::new(),
    category: "Indoor".to_string(),
    price: Decimal::new(1000, 2),
    quantity,
    image: String::new(),
    seller: Seller {
      email: seller_email.to_string(),
      name: "Seller".to_string(),
      image: None,
    },
  }
}

pub fn paid_session(id: &str, plant: &Plant, payment_intent: &str, customer: &str) -> CheckoutSession {
  CheckoutSession {
    id: id.to_string(),
    payment_status: PaymentStatus::Paid,
    amount_total_minor: Some(1000),
    payment_intent: Some(payment_intent.to_string()),
    metadata: SessionMetadata {
      plant_id: plant.id.to_string(),
      customer: customer.to_string(),
    },
  }
}
