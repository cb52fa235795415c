// verdant-server/src/db/orders.rs

use async_trait::async_trait;

use verdant::models::Order;
use verdant::store::{OrderStore, StoreResult};
use verdant::StoreError;

use super::rows::{into_orders, OrderRow, ORDER_COLUMNS};
use super::PgStore;

#[async_trait]
impl OrderStore for PgStore {
  async fn find_by_customer(&self, customer_email: &str) -> StoreResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
      "SELECT {} FROM orders WHERE customer = $1 ORDER BY ordered_at DESC",
      ORDER_COLUMNS
    ))
    .bind(customer_email)
    .fetch_all(self.pool())
    .await
    .map_err(|e| StoreError::backend("orders.find_by_customer", e))?;
    into_orders(rows)
  }

  async fn find_by_seller(&self, seller_email: &str) -> StoreResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
      "SELECT {} FROM orders WHERE seller_email = $1 ORDER BY ordered_at DESC",
      ORDER_COLUMNS
    ))
    .bind(seller_email)
    .fetch_all(self.pool())
    .await
    .map_err(|e| StoreError::backend("orders.find_by_seller", e))?;
    into_orders(rows)
  }

  async fn find_by_transaction_id(&self, transaction_id: &str) -> StoreResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders WHERE transaction_id = $1", ORDER_COLUMNS))
      .bind(transaction_id)
      .fetch_optional(self.pool())
      .await
      .map_err(|e| StoreError::backend("orders.find_by_transaction_id", e))?;
    row.map(Order::try_from).transpose()
  }
}
