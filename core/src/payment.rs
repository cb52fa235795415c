// verdant/src/payment.rs

//! Contract for the hosted-checkout payment provider.
//!
//! The storefront sells one line item per checkout session. A session carries
//! the plant id and buyer email as metadata so that fulfillment can find its
//! way back to the catalog once the provider reports the payment.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
  pub name: String,
  pub description: Option<String>,
  pub image: Option<String>,
  /// Unit price in the currency's minor unit (cents).
  pub unit_amount_minor: i64,
  pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
  #[serde(rename = "plantId", default)]
  pub plant_id: String,
  #[serde(default)]
  pub customer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
  pub line_item: LineItem,
  pub currency: String,
  pub customer_email: String,
  pub metadata: SessionMetadata,
  pub success_url: String,
  pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
  pub id: String,
  pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
  Paid,
  Unpaid,
  NoPaymentRequired,
  Other(String),
}

impl PaymentStatus {
  pub fn parse(raw: &str) -> Self {
    match raw {
      "paid" => PaymentStatus::Paid,
      "unpaid" => PaymentStatus::Unpaid,
      "no_payment_required" => PaymentStatus::NoPaymentRequired,
      other => PaymentStatus::Other(other.to_string()),
    }
  }
}

/// A checkout session as reported back by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
  pub id: String,
  pub payment_status: PaymentStatus,
  pub amount_total_minor: Option<i64>,
  pub payment_intent: Option<String>,
  pub metadata: SessionMetadata,
}

impl CheckoutSession {
  pub fn is_paid(&self) -> bool {
    self.payment_status == PaymentStatus::Paid
  }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CreatedSession, GatewayError>;

  /// Fails with [`GatewayError::SessionNotFound`] for unknown ids.
  async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GatewayError>;
}
