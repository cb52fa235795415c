// verdant/src/models/plant.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{VerdantError, VerdantResult};

pub type PlantId = Uuid;

/// Prices are stored as `NUMERIC(12, 2)`: whole cents, below ten billion.
pub const PRICE_SCALE: u32 = 2;
pub const PRICE_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// The seller embedded in every plant and copied onto every order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
  pub email: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
}

/// A catalog entry. `quantity` is the live stock counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
  #[serde(rename = "_id")]
  pub id: PlantId,
  pub name: String,
  pub description: String,
  pub category: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub quantity: i32,
  pub image: String,
  pub seller: Seller,
}

/// Body of a plant creation request: a [`Plant`] without its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub category: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub quantity: i32,
  #[serde(default)]
  pub image: String,
  pub seller: Seller,
}

impl NewPlant {
  pub fn validate(&self) -> VerdantResult<()> {
    if self.name.trim().is_empty() {
      return Err(VerdantError::Validation("plant name must not be empty".to_string()));
    }
    if self.price.is_sign_negative() {
      return Err(VerdantError::Validation(format!("price must not be negative, got {}", self.price)));
    }
    if self.price.normalize().scale() > PRICE_SCALE {
      return Err(VerdantError::Validation(format!(
        "price must have at most {} decimal places, got {}",
        PRICE_SCALE, self.price
      )));
    }
    if self.price >= PRICE_LIMIT {
      return Err(VerdantError::Validation(format!(
        "price must be below {}, got {}",
        PRICE_LIMIT, self.price
      )));
    }
    if self.quantity < 0 {
      return Err(VerdantError::Validation(format!(
        "quantity must not be negative, got {}",
        self.quantity
      )));
    }
    if self.seller.email.trim().is_empty() {
      return Err(VerdantError::Validation("seller email must not be empty".to_string()));
    }
    Ok(())
  }

  pub fn into_plant(self, id: PlantId) -> Plant {
    Plant {
      id,
      name: self.name,
      description: self.description,
      category: self.category,
      price: self.price,
      quantity: self.quantity,
      image: self.image,
      seller: self.seller,
    }
  }
}
