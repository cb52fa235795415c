// verdant/src/checkout/fulfillment.rs

//! Turning a completed checkout session into an order.
//!
//! Fulfillment runs as a five-step [`Pipeline`]:
//!
//! 1. `retrieve_payment_session` fetches the session from the provider.
//! 2. `load_plant` resolves the plant named in the session metadata.
//! 3. `check_stock` stops when no unit is left.
//! 4. `check_existing_order` looks up an order for the payment intent.
//! 5. `record_order` inserts the order and decrements stock in one unit of
//!    work, unless the session is unpaid or already fulfilled.
//!
//! Every early exit stores a [`FulfillmentOutcome`] and stops the pipeline.
//! Running it twice for the same session writes nothing the second time; a
//! concurrent duplicate loses on the unique transaction id and rolls back.

use tracing::{info, warn};
use uuid::Uuid;

use super::CheckoutBackends;
use crate::error::{GatewayError, StoreError, VerdantError, VerdantResult};
use crate::models::{NewOrder, Order, OrderId, Plant};
use crate::payment::CheckoutSession;
use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineError};
use crate::store::OrderInsert;

pub const PIPELINE_NAME: &str = "fulfillment";

pub const STEPS: &[&str] = &[
  "retrieve_payment_session",
  "load_plant",
  "check_stock",
  "check_existing_order",
  "record_order",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentOutcome {
  Fulfilled { transaction_id: String, order_id: OrderId },
  AlreadyFulfilled { transaction_id: String, order_id: OrderId },
  ProductNotFound,
  OutOfStock,
  PaymentNotCompleted,
}

/// State shared by the fulfillment steps of one run.
pub struct FulfillmentCtxData {
  pub backends: CheckoutBackends,
  pub session_id: String,
  pub session: Option<CheckoutSession>,
  pub plant: Option<Plant>,
  pub existing_order: Option<Order>,
  pub outcome: Option<FulfillmentOutcome>,
}

impl FulfillmentCtxData {
  pub fn new(backends: CheckoutBackends, session_id: impl Into<String>) -> Self {
    Self {
      backends,
      session_id: session_id.into(),
      session: None,
      plant: None,
      existing_order: None,
      outcome: None,
    }
  }
}

fn require<T: Clone>(value: &Option<T>, step_name: &str, field: &'static str) -> Result<T, PipelineError> {
  value.clone().ok_or_else(|| PipelineError::StateMissing {
    step_name: step_name.to_string(),
    field,
  })
}

fn finish(ctx: &ContextData<FulfillmentCtxData>, outcome: FulfillmentOutcome) -> PipelineControl {
  ctx.write().outcome = Some(outcome);
  PipelineControl::Stop
}

pub fn build_pipeline() -> Pipeline<FulfillmentCtxData, VerdantError> {
  let mut pipeline = Pipeline::new(PIPELINE_NAME, STEPS);
  pipeline.on_step("retrieve_payment_session", retrieve_payment_session);
  pipeline.on_step("load_plant", load_plant);
  pipeline.on_step("check_stock", check_stock);
  pipeline.on_step("check_existing_order", check_existing_order);
  pipeline.on_step("record_order", record_order);
  pipeline
}

async fn retrieve_payment_session(ctx: ContextData<FulfillmentCtxData>) -> VerdantResult<PipelineControl> {
  let (gateway, session_id) = {
    let data = ctx.read();
    (data.backends.gateway.clone(), data.session_id.clone())
  };

  let session = gateway.retrieve_session(&session_id).await?;
  info!(
    session_id = %session.id,
    paid = session.is_paid(),
    plant_id = %session.metadata.plant_id,
    "Retrieved checkout session."
  );
  ctx.write().session = Some(session);
  Ok(PipelineControl::Continue)
}

async fn load_plant(ctx: ContextData<FulfillmentCtxData>) -> VerdantResult<PipelineControl> {
  let (catalog, session) = {
    let data = ctx.read();
    (data.backends.catalog.clone(), require(&data.session, "load_plant", "session")?)
  };

  let plant_id = match Uuid::parse_str(session.metadata.plant_id.trim()) {
    Ok(id) => id,
    Err(e) => {
      warn!(raw = %session.metadata.plant_id, error = %e, "Session metadata carries no usable plant id.");
      return Ok(finish(&ctx, FulfillmentOutcome::ProductNotFound));
    }
  };

  match catalog.find_by_id(plant_id).await? {
    Some(plant) => {
      ctx.write().plant = Some(plant);
      Ok(PipelineControl::Continue)
    }
    None => {
      warn!(%plant_id, "Plant referenced by the session no longer exists.");
      Ok(finish(&ctx, FulfillmentOutcome::ProductNotFound))
    }
  }
}

async fn check_stock(ctx: ContextData<FulfillmentCtxData>) -> VerdantResult<PipelineControl> {
  let plant = require(&ctx.read().plant, "check_stock", "plant")?;
  if plant.quantity < 1 {
    info!(plant_id = %plant.id, "Plant is out of stock.");
    return Ok(finish(&ctx, FulfillmentOutcome::OutOfStock));
  }
  Ok(PipelineControl::Continue)
}

async fn check_existing_order(ctx: ContextData<FulfillmentCtxData>) -> VerdantResult<PipelineControl> {
  let (orders, session) = {
    let data = ctx.read();
    (
      data.backends.orders.clone(),
      require(&data.session, "check_existing_order", "session")?,
    )
  };

  if let Some(transaction_id) = session.payment_intent.as_deref() {
    let existing = orders.find_by_transaction_id(transaction_id).await?;
    ctx.write().existing_order = existing;
  }
  Ok(PipelineControl::Continue)
}

async fn record_order(ctx: ContextData<FulfillmentCtxData>) -> VerdantResult<PipelineControl> {
  let (backends, session, plant, existing) = {
    let data = ctx.read();
    (
      data.backends.clone(),
      require(&data.session, "record_order", "session")?,
      require(&data.plant, "record_order", "plant")?,
      data.existing_order.clone(),
    )
  };

  if !session.is_paid() {
    info!(session_id = %session.id, status = ?session.payment_status, "Session is not paid.");
    return Ok(finish(&ctx, FulfillmentOutcome::PaymentNotCompleted));
  }

  if let Some(order) = existing {
    info!(transaction_id = %order.transaction_id, order_id = %order.id, "Session already fulfilled.");
    return Ok(finish(
      &ctx,
      FulfillmentOutcome::AlreadyFulfilled {
        transaction_id: order.transaction_id,
        order_id: order.id,
      },
    ));
  }

  let transaction_id = session
    .payment_intent
    .clone()
    .ok_or_else(|| GatewayError::Malformed(format!("paid session {} has no payment intent", session.id)))?;
  let amount_total_minor = session
    .amount_total_minor
    .ok_or_else(|| GatewayError::Malformed(format!("paid session {} has no amount_total", session.id)))?;

  let new_order = NewOrder::snapshot(&plant, &transaction_id, &session.metadata.customer, amount_total_minor);

  let mut uow = backends.unit_of_work.begin().await?;
  let order_id = match uow.insert_order(&new_order).await? {
    OrderInsert::Inserted(order_id) => order_id,
    OrderInsert::DuplicateTransaction => {
      uow.rollback().await?;
      let winner = backends
        .orders
        .find_by_transaction_id(&transaction_id)
        .await?
        .ok_or_else(|| {
          StoreError::backend(
            "find_by_transaction_id",
            anyhow::anyhow!("duplicate transaction {} but no order holds it", transaction_id),
          )
        })?;
      info!(%transaction_id, order_id = %winner.id, "Lost fulfillment race; order already recorded.");
      return Ok(finish(
        &ctx,
        FulfillmentOutcome::AlreadyFulfilled {
          transaction_id,
          order_id: winner.id,
        },
      ));
    }
  };

  if !uow.decrement_stock(plant.id).await? {
    uow.rollback().await?;
    info!(plant_id = %plant.id, %transaction_id, "Stock ran out before the order could be recorded.");
    return Ok(finish(&ctx, FulfillmentOutcome::OutOfStock));
  }
  uow.commit().await?;

  info!(%transaction_id, %order_id, plant_id = %plant.id, "Order recorded.");
  ctx.write().outcome = Some(FulfillmentOutcome::Fulfilled {
    transaction_id,
    order_id,
  });
  Ok(PipelineControl::Continue)
}

/// Runs `pipeline` for `session_id` and returns the recorded outcome.
pub async fn fulfill(
  pipeline: &Pipeline<FulfillmentCtxData, VerdantError>,
  backends: &CheckoutBackends,
  session_id: &str,
) -> VerdantResult<FulfillmentOutcome> {
  let ctx = ContextData::new(FulfillmentCtxData::new(backends.clone(), session_id));
  pipeline.run(ctx.clone()).await?;
  let outcome = require(&ctx.read().outcome, PIPELINE_NAME, "outcome")?;
  Ok(outcome)
}
