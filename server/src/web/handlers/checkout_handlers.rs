// verdant-server/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use verdant::{CheckoutRequest, FulfillmentOutcome};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCaller;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccessPayload {
  pub session_id: String,
}

#[instrument(
  name = "handler::create_checkout_session",
  skip(app_state, caller, payload),
  fields(caller = %caller.email(), plant_id = %payload.plant_id)
)]
pub async fn create_checkout_session_handler(
  app_state: web::Data<AppState>,
  caller: AuthenticatedCaller,
  payload: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
  let request = payload.into_inner();
  caller.ensure_owns(&request.customer.email)?;

  let session = app_state.storefront.start_checkout(request).await?;
  Ok(HttpResponse::Ok().json(json!({ "url": session.url })))
}

/// Maps a fulfillment outcome to the response the storefront client expects.
pub fn outcome_response(outcome: FulfillmentOutcome) -> HttpResponse {
  match outcome {
    FulfillmentOutcome::Fulfilled {
      transaction_id,
      order_id,
    } => HttpResponse::Ok().json(json!({
      "transactionId": transaction_id,
      "orderId": order_id,
    })),
    FulfillmentOutcome::AlreadyFulfilled {
      transaction_id,
      order_id,
    } => HttpResponse::Ok().json(json!({
      "transactionId": transaction_id,
      "orderId": order_id,
      "alreadyFulfilled": true,
    })),
    FulfillmentOutcome::ProductNotFound => HttpResponse::NotFound().json(json!({ "error": "Product not found" })),
    FulfillmentOutcome::OutOfStock => HttpResponse::Conflict().json(json!({
      "outOfStock": true,
      "message": "Product is out of stock",
    })),
    FulfillmentOutcome::PaymentNotCompleted => HttpResponse::PaymentRequired().json(json!({
      "success": false,
      "message": "Payment not completed",
    })),
  }
}

#[instrument(name = "handler::payment_success", skip(app_state, payload), fields(session_id = %payload.session_id))]
pub async fn payment_success_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<PaymentSuccessPayload>,
) -> Result<HttpResponse, AppError> {
  let session_id = payload.into_inner().session_id;
  if session_id.trim().is_empty() {
    return Err(AppError::Validation("sessionId must not be empty".to_string()));
  }

  let outcome = app_state.storefront.fulfill(session_id.trim()).await?;
  info!(?outcome, "Fulfillment finished.");
  Ok(outcome_response(outcome))
}
