// verdant-server/src/web/handlers/mod.rs

pub mod checkout_handlers;
pub mod order_handlers;
pub mod plant_handlers;
