// verdant-server/src/web/handlers/plant_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use verdant::models::NewPlant;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCaller;

#[instrument(
  name = "handler::create_plant",
  skip(app_state, caller, payload),
  fields(caller = %caller.email(), plant = %payload.name)
)]
pub async fn create_plant_handler(
  app_state: web::Data<AppState>,
  caller: AuthenticatedCaller,
  payload: web::Json<NewPlant>,
) -> Result<HttpResponse, AppError> {
  let plant = payload.into_inner();
  caller.ensure_owns(&plant.seller.email)?;

  let inserted_id = app_state.storefront.create_plant(plant).await?;
  info!(%inserted_id, "Plant created.");
  Ok(HttpResponse::Created().json(json!({
    "acknowledged": true,
    "insertedId": inserted_id,
  })))
}

#[instrument(name = "handler::list_plants", skip(app_state))]
pub async fn list_plants_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let plants = app_state.storefront.list_plants().await?;
  info!("Fetched {} plants.", plants.len());
  Ok(HttpResponse::Ok().json(plants))
}

#[instrument(name = "handler::get_plant", skip(app_state, path), fields(plant_id = %path.as_ref()))]
pub async fn get_plant_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let raw_id = path.into_inner();
  let plant_id = Uuid::parse_str(&raw_id).map_err(|e| AppError::Validation(format!("invalid plant id '{}': {}", raw_id, e)))?;

  let plant = app_state.storefront.plant(plant_id).await?;
  Ok(HttpResponse::Ok().json(plant))
}

#[instrument(name = "handler::my_inventory", skip(app_state, caller, path))]
pub async fn my_inventory_handler(
  app_state: web::Data<AppState>,
  caller: AuthenticatedCaller,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let seller_email = path.into_inner();
  caller.ensure_owns(&seller_email)?;

  let plants = app_state.storefront.inventory(&seller_email).await?;
  Ok(HttpResponse::Ok().json(plants))
}
