// verdant/src/checkout/session.rs

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{CheckoutBackends, CheckoutSettings};
use crate::error::{VerdantError, VerdantResult};
use crate::payment::{CheckoutSessionRequest, CreatedSession, LineItem, SessionMetadata};

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutCustomer {
  pub email: String,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub image: Option<String>,
}

/// Body of `POST /create/checkout-session`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub image: Option<String>,
  pub quantity: i64,
  pub plant_id: String,
  pub customer: CheckoutCustomer,
}

/// Converts a currency amount to whole minor units (cents), rounding half
/// away from zero. `None` when the result does not fit.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
  amount
    .checked_mul(Decimal::ONE_HUNDRED)?
    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    .to_i64()
}

impl CheckoutRequest {
  /// Checks the line item and returns the unit price in minor units.
  pub fn validate(&self) -> VerdantResult<i64> {
    if self.name.trim().is_empty() {
      return Err(VerdantError::Validation("item name must not be empty".to_string()));
    }
    if self.quantity < 1 {
      return Err(VerdantError::Validation(format!(
        "quantity must be positive, got {}",
        self.quantity
      )));
    }
    if self.customer.email.trim().is_empty() {
      return Err(VerdantError::Validation("customer email must not be empty".to_string()));
    }
    match to_minor_units(self.price) {
      Some(minor) if minor >= 1 => Ok(minor),
      _ => Err(VerdantError::Validation(format!("price must be positive, got {}", self.price))),
    }
  }
}

fn non_blank(value: &Option<String>) -> Option<String> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Creates a hosted checkout session for one plant and returns it.
///
/// The plant must exist and hold at least the requested quantity; the buyer is
/// never sent to pay for stock that is already gone.
#[instrument(
  name = "checkout::start",
  skip(backends, settings, request),
  fields(plant_id = %request.plant_id, quantity = request.quantity),
  err(Display)
)]
pub async fn start_checkout(
  backends: &CheckoutBackends,
  settings: &CheckoutSettings,
  request: CheckoutRequest,
) -> VerdantResult<CreatedSession> {
  let unit_amount_minor = request.validate()?;
  let plant_id = Uuid::parse_str(request.plant_id.trim())
    .map_err(|e| VerdantError::Validation(format!("invalid plantId '{}': {}", request.plant_id, e)))?;

  let plant = backends
    .catalog
    .find_by_id(plant_id)
    .await?
    .ok_or_else(|| VerdantError::NotFound(format!("plant {}", plant_id)))?;
  if i64::from(plant.quantity) < request.quantity {
    return Err(VerdantError::OutOfStock { plant_id });
  }

  let customer_email = request.customer.email.trim().to_string();
  let session_request = CheckoutSessionRequest {
    line_item: LineItem {
      name: request.name.trim().to_string(),
      description: non_blank(&request.description),
      image: non_blank(&request.image),
      unit_amount_minor,
      quantity: request.quantity,
    },
    currency: settings.currency.clone(),
    customer_email: customer_email.clone(),
    metadata: SessionMetadata {
      plant_id: plant_id.to_string(),
      customer: customer_email,
    },
    success_url: settings.success_url(),
    cancel_url: settings.cancel_url(&plant_id.to_string()),
  };

  let created = backends.gateway.create_checkout_session(session_request).await?;
  info!(session_id = %created.id, "Checkout session created.");
  Ok(created)
}
