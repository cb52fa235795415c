// verdant/src/checkout/mod.rs

//! Checkout: creating hosted payment sessions and fulfilling paid ones.

pub mod fulfillment;
pub mod session;

use std::sync::Arc;

use crate::payment::PaymentGateway;
use crate::store::{CatalogStore, OrderStore, UnitOfWork};

pub use fulfillment::{FulfillmentCtxData, FulfillmentOutcome};
pub use session::{CheckoutCustomer, CheckoutRequest};

/// The injected clients checkout talks to.
#[derive(Clone)]
pub struct CheckoutBackends {
  pub catalog: Arc<dyn CatalogStore>,
  pub orders: Arc<dyn OrderStore>,
  pub unit_of_work: Arc<dyn UnitOfWork>,
  pub gateway: Arc<dyn PaymentGateway>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
  /// Origin of the storefront frontend; redirect URLs are built from it.
  pub client_domain: String,
  pub currency: String,
}

impl CheckoutSettings {
  pub fn success_url(&self) -> String {
    format!(
      "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
      self.client_domain.trim_end_matches('/')
    )
  }

  pub fn cancel_url(&self, plant_id: &str) -> String {
    format!("{}/plant/{}", self.client_domain.trim_end_matches('/'), plant_id)
  }
}
