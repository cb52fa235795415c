// verdant-server/src/db/catalog.rs

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use verdant::models::{NewPlant, Plant, PlantId};
use verdant::store::{CatalogStore, StoreResult};
use verdant::StoreError;

use super::rows::{PlantRow, PLANT_COLUMNS};
use super::PgStore;

#[async_trait]
impl CatalogStore for PgStore {
  #[instrument(name = "db::plants::insert", skip(self, plant), fields(seller = %plant.seller.email))]
  async fn insert(&self, plant: NewPlant) -> StoreResult<PlantId> {
    let id = Uuid::new_v4();
    sqlx::query(
      "INSERT INTO plants (id, name, description, category, price, quantity, image, seller_email, seller_name, seller_image) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(id)
    .bind(&plant.name)
    .bind(&plant.description)
    .bind(&plant.category)
    .bind(plant.price)
    .bind(plant.quantity)
    .bind(&plant.image)
    .bind(&plant.seller.email)
    .bind(&plant.seller.name)
    .bind(&plant.seller.image)
    .execute(self.pool())
    .await
    .map_err(|e| StoreError::backend("plants.insert", e))?;
    Ok(id)
  }

  async fn find_all(&self) -> StoreResult<Vec<Plant>> {
    let rows: Vec<PlantRow> = sqlx::query_as(&format!("SELECT {} FROM plants ORDER BY created_at, id", PLANT_COLUMNS))
      .fetch_all(self.pool())
      .await
      .map_err(|e| StoreError::backend("plants.find_all", e))?;
    Ok(rows.into_iter().map(Plant::from).collect())
  }

  async fn find_by_id(&self, id: PlantId) -> StoreResult<Option<Plant>> {
    let row: Option<PlantRow> = sqlx::query_as(&format!("SELECT {} FROM plants WHERE id = $1", PLANT_COLUMNS))
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(|e| StoreError::backend("plants.find_by_id", e))?;
    Ok(row.map(Plant::from))
  }

  async fn find_by_seller(&self, seller_email: &str) -> StoreResult<Vec<Plant>> {
    let rows: Vec<PlantRow> = sqlx::query_as(&format!(
      "SELECT {} FROM plants WHERE seller_email = $1 ORDER BY created_at, id",
      PLANT_COLUMNS
    ))
    .bind(seller_email)
    .fetch_all(self.pool())
    .await
    .map_err(|e| StoreError::backend("plants.find_by_seller", e))?;
    Ok(rows.into_iter().map(Plant::from).collect())
  }

  async fn adjust_quantity(&self, id: PlantId, delta: i32) -> StoreResult<bool> {
    let result = sqlx::query("UPDATE plants SET quantity = quantity + $2 WHERE id = $1 AND quantity + $2 >= 0")
      .bind(id)
      .bind(delta)
      .execute(self.pool())
      .await
      .map_err(|e| StoreError::backend("plants.adjust_quantity", e))?;
    Ok(result.rows_affected() == 1)
  }
}
