// verdant-server/src/services/stripe.rs

//! Stripe Checkout over its REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use verdant::payment::{CheckoutSession, CheckoutSessionRequest, CreatedSession, PaymentStatus, SessionMetadata};
use verdant::{GatewayError, PaymentGateway};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct StripeGateway {
  client: reqwest::Client,
  api_base: String,
  secret_key: String,
}

#[derive(Debug, Deserialize)]
struct CreatedSessionBody {
  id: String,
  url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
  id: String,
  payment_status: String,
  amount_total: Option<i64>,
  payment_intent: Option<String>,
  #[serde(default)]
  metadata: SessionMetadata,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  message: Option<String>,
  code: Option<String>,
}

impl StripeGateway {
  pub fn new(api_base: &str, secret_key: &str) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(Self {
      client,
      api_base: api_base.trim_end_matches('/').to_string(),
      secret_key: secret_key.to_string(),
    })
  }

  fn sessions_url(&self) -> String {
    format!("{}/v1/checkout/sessions", self.api_base)
  }
}

/// Checkout session ids are opaque but only ever contain ASCII letters,
/// digits and underscores.
pub fn is_valid_session_id(session_id: &str) -> bool {
  !session_id.is_empty() && session_id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Flattens a session request into Stripe's bracketed form encoding.
pub fn session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
  let item = &request.line_item;
  let mut form = vec![
    ("mode".to_string(), "payment".to_string()),
    ("line_items[0][quantity]".to_string(), item.quantity.to_string()),
    ("line_items[0][price_data][currency]".to_string(), request.currency.clone()),
    ("line_items[0][price_data][unit_amount]".to_string(), item.unit_amount_minor.to_string()),
    ("line_items[0][price_data][product_data][name]".to_string(), item.name.clone()),
  ];
  if let Some(description) = &item.description {
    form.push((
      "line_items[0][price_data][product_data][description]".to_string(),
      description.clone(),
    ));
  }
  if let Some(image) = &item.image {
    form.push(("line_items[0][price_data][product_data][images][0]".to_string(), image.clone()));
  }
  form.extend([
    ("customer_email".to_string(), request.customer_email.clone()),
    ("metadata[plantId]".to_string(), request.metadata.plant_id.clone()),
    ("metadata[customer]".to_string(), request.metadata.customer.clone()),
    ("success_url".to_string(), request.success_url.clone()),
    ("cancel_url".to_string(), request.cancel_url.clone()),
  ]);
  form
}

fn transport(err: reqwest::Error) -> GatewayError {
  GatewayError::Transport { source: err.into() }
}

async fn rejection(response: reqwest::Response) -> GatewayError {
  let status = response.status().as_u16();
  let text = response.text().await.unwrap_or_default();
  let message = match serde_json::from_str::<ErrorEnvelope>(&text) {
    Ok(envelope) => match (envelope.error.code, envelope.error.message) {
      (Some(code), Some(message)) => format!("{}: {}", code, message),
      (None, Some(message)) => message,
      (Some(code), None) => code,
      (None, None) => text,
    },
    Err(_) => text,
  };
  warn!(status, %message, "Stripe rejected the request.");
  GatewayError::Rejected { status, message }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
  #[instrument(name = "stripe::create_checkout_session", skip(self, request), fields(plant_id = %request.metadata.plant_id))]
  async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CreatedSession, GatewayError> {
    let response = self
      .client
      .post(self.sessions_url())
      .basic_auth(&self.secret_key, Some(""))
      .form(&session_form(&request))
      .send()
      .await
      .map_err(transport)?;

    if !response.status().is_success() {
      return Err(rejection(response).await);
    }

    let body: CreatedSessionBody = response
      .json()
      .await
      .map_err(|e| GatewayError::Malformed(format!("checkout session body: {}", e)))?;
    let url = body
      .url
      .ok_or_else(|| GatewayError::Malformed(format!("checkout session {} has no url", body.id)))?;
    info!(session_id = %body.id, "Stripe checkout session created.");
    Ok(CreatedSession { id: body.id, url })
  }

  #[instrument(name = "stripe::retrieve_session", skip(self))]
  async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GatewayError> {
    if !is_valid_session_id(session_id) {
      return Err(GatewayError::SessionNotFound {
        session_id: session_id.to_string(),
      });
    }

    let response = self
      .client
      .get(format!("{}/{}", self.sessions_url(), session_id))
      .basic_auth(&self.secret_key, Some(""))
      .send()
      .await
      .map_err(transport)?;

    if response.status() == StatusCode::NOT_FOUND {
      return Err(GatewayError::SessionNotFound {
        session_id: session_id.to_string(),
      });
    }
    if !response.status().is_success() {
      return Err(rejection(response).await);
    }

    let body: SessionBody = response
      .json()
      .await
      .map_err(|e| GatewayError::Malformed(format!("checkout session body: {}", e)))?;
    Ok(CheckoutSession {
      id: body.id,
      payment_status: PaymentStatus::parse(&body.payment_status),
      amount_total_minor: body.amount_total,
      payment_intent: body.payment_intent,
      metadata: body.metadata,
    })
  }
}
