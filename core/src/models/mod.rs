// verdant/src/models/mod.rs

//! Records held by the catalog and order stores.

pub mod order;
pub mod plant;

pub use order::{NewOrder, Order, OrderId, OrderStatus};
pub use plant::{NewPlant, Plant, PlantId, Seller};
