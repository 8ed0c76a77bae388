use leasey_core::{ProspectId, TourId, TourStatus, TourWithUnit, UnitId};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::units::decode_unit_type;
use super::RepositoryError;
use crate::DbPool;

#[derive(Clone)]
pub struct SqlTourRepository {
    pool: DbPool,
}

impl SqlTourRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a booking with status fixed to `Scheduled`. Storage failures
    /// (e.g. an unknown prospect id tripping the foreign key) surface as
    /// `Err`; the tool layer converts them into error payloads.
    pub async fn schedule(
        &self,
        prospect_id: &ProspectId,
        tour_date: &str,
        tour_time: &str,
        unit_id: Option<UnitId>,
        is_virtual: bool,
        notes: Option<&str>,
    ) -> Result<TourId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO tours (prospect_id, tour_date, tour_time, unit_id, is_virtual, status, notes) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&prospect_id.0)
        .bind(tour_date)
        .bind(tour_time)
        .bind(unit_id.map(|unit_id| unit_id.0))
        .bind(is_virtual)
        .bind(TourStatus::Scheduled.as_str())
        .bind(notes)
        .execute(&self.pool)
        .await?;

        Ok(TourId(result.last_insert_rowid()))
    }

    /// Bookings for one prospect, left-joined with unit summary fields,
    /// ordered by date then time ascending.
    pub async fn list_for_prospect(
        &self,
        prospect_id: &ProspectId,
    ) -> Result<Vec<TourWithUnit>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT t.id, t.prospect_id, t.tour_date, t.tour_time, t.unit_id, t.is_virtual, \
             t.status, t.notes, u.unit_number, u.unit_type, u.floor_plan \
             FROM tours t \
             LEFT JOIN units u ON t.unit_id = u.id \
             WHERE t.prospect_id = ? \
             ORDER BY t.tour_date, t.tour_time",
        )
        .bind(&prospect_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_tour_with_unit).collect()
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM tours").fetch_one(&self.pool).await?;
        Ok(row.get::<i64, _>("count"))
    }
}

fn decode_tour_with_unit(row: &SqliteRow) -> Result<TourWithUnit, RepositoryError> {
    let status_raw: String = row.try_get("status")?;
    let status = status_raw
        .parse::<TourStatus>()
        .map_err(|error| RepositoryError::Decode(error.to_string()))?;

    let unit_type = match row.try_get::<Option<String>, _>("unit_type")? {
        Some(_) => Some(decode_unit_type(row, "unit_type")?),
        None => None,
    };

    Ok(TourWithUnit {
        id: TourId(row.try_get("id")?),
        prospect_id: ProspectId(row.try_get("prospect_id")?),
        tour_date: row.try_get("tour_date")?,
        tour_time: row.try_get("tour_time")?,
        unit_id: row.try_get::<Option<i64>, _>("unit_id")?.map(UnitId),
        is_virtual: row.try_get("is_virtual")?,
        status,
        notes: row.try_get("notes")?,
        unit_number: row.try_get("unit_number")?,
        unit_type,
        floor_plan: row.try_get("floor_plan")?,
    })
}
