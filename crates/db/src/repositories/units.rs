use leasey_core::{PricingSummary, Unit, UnitId, UnitType};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::RepositoryError;
use crate::DbPool;

const UNIT_COLUMNS: &str = "id, unit_number, unit_type, floor_plan, square_feet, bedrooms, \
     bathrooms, rent_amount, is_available, available_date, features";

#[derive(Clone)]
pub struct SqlUnitRepository {
    pool: DbPool,
}

impl SqlUnitRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Available units in storage order. Filters bind raw strings so that
    /// unknown types or odd date literals yield empty results, not errors.
    pub async fn list_available(
        &self,
        unit_type: Option<&str>,
        not_available_after: Option<&str>,
    ) -> Result<Vec<Unit>, RepositoryError> {
        let mut sql = format!("SELECT {UNIT_COLUMNS} FROM units WHERE is_available = 1");
        if unit_type.is_some() {
            sql.push_str(" AND unit_type = ?");
        }
        if not_available_after.is_some() {
            sql.push_str(" AND available_date <= ?");
        }

        let mut query = sqlx::query(&sql);
        if let Some(unit_type) = unit_type {
            query = query.bind(unit_type);
        }
        if let Some(bound) = not_available_after {
            query = query.bind(bound);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(decode_unit).collect()
    }

    pub async fn find_by_id(&self, id: UnitId) -> Result<Option<Unit>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {UNIT_COLUMNS} FROM units WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_unit).transpose()
    }

    /// Rent aggregates per type over ALL units, available or not.
    pub async fn pricing_summary(
        &self,
        unit_type: Option<&str>,
    ) -> Result<Vec<PricingSummary>, RepositoryError> {
        let mut sql = String::from(
            "SELECT unit_type, MIN(rent_amount) AS min_rent, MAX(rent_amount) AS max_rent, \
             AVG(rent_amount) AS mean_rent, COUNT(*) AS count FROM units",
        );
        if unit_type.is_some() {
            sql.push_str(" WHERE unit_type = ?");
        }
        sql.push_str(" GROUP BY unit_type");

        let mut query = sqlx::query(&sql);
        if let Some(unit_type) = unit_type {
            query = query.bind(unit_type);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                Ok(PricingSummary {
                    unit_type: decode_unit_type(row, "unit_type")?,
                    min_rent: row.try_get("min_rent")?,
                    max_rent: row.try_get("max_rent")?,
                    mean_rent: row.try_get("mean_rent")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }
}

fn decode_unit(row: &SqliteRow) -> Result<Unit, RepositoryError> {
    Ok(Unit {
        id: UnitId(row.try_get("id")?),
        unit_number: row.try_get("unit_number")?,
        unit_type: decode_unit_type(row, "unit_type")?,
        floor_plan: row.try_get("floor_plan")?,
        square_feet: row.try_get("square_feet")?,
        bedrooms: row.try_get("bedrooms")?,
        bathrooms: row.try_get("bathrooms")?,
        rent_amount: row.try_get("rent_amount")?,
        is_available: row.try_get("is_available")?,
        available_date: row.try_get("available_date")?,
        features: row.try_get("features")?,
    })
}

pub(crate) fn decode_unit_type(row: &SqliteRow, column: &str) -> Result<UnitType, RepositoryError> {
    let raw: String = row.try_get(column)?;
    raw.parse::<UnitType>().map_err(|error| RepositoryError::Decode(error.to_string()))
}
