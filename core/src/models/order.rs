// verdant/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plant::{Plant, PlantId, Seller};

pub type OrderId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "pending" => Some(OrderStatus::Pending),
      _ => None,
    }
  }
}

/// A fulfilled purchase. Seller, name, category and image are a snapshot of the
/// plant at order time, not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  #[serde(rename = "_id")]
  pub id: OrderId,
  pub plant_id: PlantId,
  pub transaction_id: String,
  pub customer: String,
  pub status: OrderStatus,
  pub seller: Seller,
  pub name: String,
  pub category: String,
  pub quantity: i32,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub image: String,
  pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub plant_id: PlantId,
  pub transaction_id: String,
  pub customer: String,
  pub status: OrderStatus,
  pub seller: Seller,
  pub name: String,
  pub category: String,
  pub quantity: i32,
  pub price: Decimal,
  pub image: String,
  pub date: DateTime<Utc>,
}

impl NewOrder {
  /// Copies the plant fields an order keeps, charging `amount_total_minor`
  /// (cents) for a single unit.
  pub fn snapshot(plant: &Plant, transaction_id: &str, customer: &str, amount_total_minor: i64) -> Self {
    NewOrder {
      plant_id: plant.id,
      transaction_id: transaction_id.to_string(),
      customer: customer.to_string(),
      status: OrderStatus::Pending,
      seller: plant.seller.clone(),
      name: plant.name.clone(),
      category: plant.category.clone(),
      quantity: 1,
      price: Decimal::new(amount_total_minor, 2),
      image: plant.image.clone(),
      date: Utc::now(),
    }
  }

  pub fn into_order(self, id: OrderId) -> Order {
    Order {
      id,
      plant_id: self.plant_id,
      transaction_id: self.transaction_id,
      customer: self.customer,
      status: self.status,
      seller: self.seller,
      name: self.name,
      category: self.category,
      quantity: self.quantity,
      price: self.price,
      image: self.image,
      date: self.date,
    }
  }
}
