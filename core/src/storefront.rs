// verdant/src/storefront.rs

use tracing::{info, instrument};

use crate::checkout::fulfillment::{self, FulfillmentCtxData, FulfillmentOutcome};
use crate::checkout::session::{self, CheckoutRequest};
use crate::checkout::{CheckoutBackends, CheckoutSettings};
use crate::error::{VerdantError, VerdantResult};
use crate::models::{NewPlant, Order, Plant, PlantId};
use crate::payment::CreatedSession;
use crate::pipeline::Pipeline;

/// Everything the HTTP surface can ask of the store: catalog reads and writes,
/// order listings, checkout and fulfillment.
///
/// Ownership checks (who may list whose orders) are the caller's job; the
/// storefront trusts the emails it is given.
pub struct Storefront {
  backends: CheckoutBackends,
  settings: CheckoutSettings,
  fulfillment: Pipeline<FulfillmentCtxData, VerdantError>,
}

impl Storefront {
  pub fn new(backends: CheckoutBackends, settings: CheckoutSettings) -> Self {
    Self {
      backends,
      settings,
      fulfillment: fulfillment::build_pipeline(),
    }
  }

  #[instrument(name = "storefront::create_plant", skip(self, plant), fields(seller = %plant.seller.email), err(Display))]
  pub async fn create_plant(&self, plant: NewPlant) -> VerdantResult<PlantId> {
    plant.validate()?;
    let id = self.backends.catalog.insert(plant).await?;
    info!(plant_id = %id, "Plant listed.");
    Ok(id)
  }

  pub async fn list_plants(&self) -> VerdantResult<Vec<Plant>> {
    Ok(self.backends.catalog.find_all().await?)
  }

  pub async fn plant(&self, id: PlantId) -> VerdantResult<Plant> {
    self
      .backends
      .catalog
      .find_by_id(id)
      .await?
      .ok_or_else(|| VerdantError::NotFound(format!("plant {}", id)))
  }

  pub async fn inventory(&self, seller_email: &str) -> VerdantResult<Vec<Plant>> {
    Ok(self.backends.catalog.find_by_seller(seller_email).await?)
  }

  pub async fn customer_orders(&self, customer_email: &str) -> VerdantResult<Vec<Order>> {
    Ok(self.backends.orders.find_by_customer(customer_email).await?)
  }

  pub async fn seller_orders(&self, seller_email: &str) -> VerdantResult<Vec<Order>> {
    Ok(self.backends.orders.find_by_seller(seller_email).await?)
  }

  pub async fn start_checkout(&self, request: CheckoutRequest) -> VerdantResult<CreatedSession> {
    session::start_checkout(&self.backends, &self.settings, request).await
  }

  #[instrument(name = "storefront::fulfill", skip(self), err(Display))]
  pub async fn fulfill(&self, session_id: &str) -> VerdantResult<FulfillmentOutcome> {
    fulfillment::fulfill(&self.fulfillment, &self.backends, session_id).await
  }
}
