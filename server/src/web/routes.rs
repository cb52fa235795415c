// verdant-server/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{checkout_handlers, order_handlers, plant_handlers};

async fn greeting_handler() -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("Hello from Server..")
}

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Rejects undecodable JSON bodies through [`AppError`] so they get the same
/// JSON error shape as every other failure.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(json_config())
    .route("/", web::get().to(greeting_handler))
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::resource("/plants")
        .route(web::get().to(plant_handlers::list_plants_handler))
        .route(web::post().to(plant_handlers::create_plant_handler)),
    )
    .route("/plants/{id}", web::get().to(plant_handlers::get_plant_handler))
    .route(
      "/create/checkout-session",
      web::post().to(checkout_handlers::create_checkout_session_handler),
    )
    .route(
      "/payment-success",
      web::post().to(checkout_handlers::payment_success_handler),
    )
    .route("/my-orders/{email}", web::get().to(order_handlers::my_orders_handler))
    .route(
      "/manage-orders/{email}",
      web::get().to(order_handlers::manage_orders_handler),
    )
    .route(
      "/my-inventory/{email}",
      web::get().to(plant_handlers::my_inventory_handler),
    );
}
