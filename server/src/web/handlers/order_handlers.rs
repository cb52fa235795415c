// verdant-server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCaller;

#[instrument(name = "handler::my_orders", skip(app_state, caller, path))]
pub async fn my_orders_handler(
  app_state: web::Data<AppState>,
  caller: AuthenticatedCaller,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let customer_email = path.into_inner();
  caller.ensure_owns(&customer_email)?;

  let orders = app_state.storefront.customer_orders(&customer_email).await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::manage_orders", skip(app_state, caller, path))]
pub async fn manage_orders_handler(
  app_state: web::Data<AppState>,
  caller: AuthenticatedCaller,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let seller_email = path.into_inner();
  caller.ensure_owns(&seller_email)?;

  let orders = app_state.storefront.seller_orders(&seller_email).await?;
  Ok(HttpResponse::Ok().json(orders))
}
