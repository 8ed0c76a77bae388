use leasey_core::{Amenity, AmenityId};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::RepositoryError;
use crate::DbPool;

#[derive(Clone)]
pub struct SqlAmenityRepository {
    pool: DbPool,
}

impl SqlAmenityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Amenity>, RepositoryError> {
        let mut sql = String::from(
            "SELECT id, name, description, category, fee_amount, is_included FROM amenities",
        );
        if category.is_some() {
            sql.push_str(" WHERE category = ?");
        }

        let mut query = sqlx::query(&sql);
        if let Some(category) = category {
            query = query.bind(category);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(decode_amenity).collect()
    }
}

fn decode_amenity(row: &SqliteRow) -> Result<Amenity, RepositoryError> {
    Ok(Amenity {
        id: AmenityId(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        fee_amount: row.try_get("fee_amount")?,
        is_included: row.try_get("is_included")?,
    })
}
