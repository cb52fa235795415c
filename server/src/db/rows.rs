// verdant-server/src/db/rows.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use verdant::models::{Order, OrderStatus, Plant, Seller};
use verdant::StoreError;

pub(crate) const PLANT_COLUMNS: &str =
  "id, name, description, category, price, quantity, image, seller_email, seller_name, seller_image";

pub(crate) const ORDER_COLUMNS: &str = "id, plant_id, transaction_id, customer, status, seller_email, seller_name, \
   seller_image, name, category, quantity, price, image, ordered_at";

#[derive(Debug, FromRow)]
pub(crate) struct PlantRow {
  id: Uuid,
  name: String,
  description: String,
  category: String,
  price: Decimal,
  quantity: i32,
  image: String,
  seller_email: String,
  seller_name: String,
  seller_image: Option<String>,
}

impl From<PlantRow> for Plant {
  fn from(row: PlantRow) -> Self {
    Plant {
      id: row.id,
      name: row.name,
      description: row.description,
      category: row.category,
      price: row.price,
      quantity: row.quantity,
      image: row.image,
      seller: Seller {
        email: row.seller_email,
        name: row.seller_name,
        image: row.seller_image,
      },
    }
  }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
  id: Uuid,
  plant_id: Uuid,
  transaction_id: String,
  customer: String,
  status: String,
  seller_email: String,
  seller_name: String,
  seller_image: Option<String>,
  name: String,
  category: String,
  quantity: i32,
  price: Decimal,
  image: String,
  ordered_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = StoreError;

  fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
    let status = OrderStatus::parse(&row.status).ok_or_else(|| {
      StoreError::backend(
        "orders.decode",
        anyhow::anyhow!("order {} has unknown status '{}'", row.id, row.status),
      )
    })?;
    Ok(Order {
      id: row.id,
      plant_id: row.plant_id,
      transaction_id: row.transaction_id,
      customer: row.customer,
      status,
      seller: Seller {
        email: row.seller_email,
        name: row.seller_name,
        image: row.seller_image,
      },
      name: row.name,
      category: row.category,
      quantity: row.quantity,
      price: row.price,
      image: row.image,
      date: row.ordered_at,
    })
  }
}

pub(crate) fn into_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, StoreError> {
  rows.into_iter().map(Order::try_from).collect()
}
