use sqlx::{Executor, Row};

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_UNIT_COUNT: i64 = 8;
const SEED_AMENITY_COUNT: i64 = 10;
const SEED_AVAILABLE_UNIT_COUNT: i64 = 4;
const SEED_PET_AMENITY_COUNT: i64 = 2;

/// Fixed property dataset loaded into a fresh store at process start:
/// eight units across two floor-plan types and ten building amenities.
pub struct SeedDataset;

impl SeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/seed_data.sql");

    /// Load the seed rows in one transaction. The schema must exist.
    pub async fn load(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Verify that the seed rows landed and match the fixed dataset contract.
    pub async fn verify(pool: &DbPool) -> Result<SeedVerification, RepositoryError> {
        let mut checks = Vec::new();

        checks.push((
            "unit-count",
            count(pool, "SELECT COUNT(*) AS count FROM units").await? == SEED_UNIT_COUNT,
        ));
        checks.push((
            "amenity-count",
            count(pool, "SELECT COUNT(*) AS count FROM amenities").await? == SEED_AMENITY_COUNT,
        ));
        checks.push((
            "available-unit-count",
            count(pool, "SELECT COUNT(*) AS count FROM units WHERE is_available = 1").await?
                == SEED_AVAILABLE_UNIT_COUNT,
        ));
        checks.push((
            "pet-amenity-count",
            count(pool, "SELECT COUNT(*) AS count FROM amenities WHERE category = 'Pets'").await?
                == SEED_PET_AMENITY_COUNT,
        ));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(SeedVerification { checks, all_present })
    }
}

#[derive(Debug)]
pub struct SeedVerification {
    pub checks: Vec<(&'static str, bool)>,
    pub all_present: bool,
}

async fn count(pool: &DbPool, sql: &str) -> Result<i64, RepositoryError> {
    Ok(sqlx::query(sql).fetch_one(pool).await?.get::<i64, _>("count"))
}

#[cfg(test)]
mod tests {
    use super::SeedDataset;
    use crate::{connect_ephemeral, schema};

    #[tokio::test]
    async fn seed_loads_and_verifies_on_fresh_schema() {
        let pool = connect_ephemeral().await.expect("connect");
        schema::create_all(&pool).await.expect("schema");
        SeedDataset::load(&pool).await.expect("seed");

        let verification = SeedDataset::verify(&pool).await.expect("verify");
        assert!(verification.all_present, "failed checks: {:?}", verification.checks);
    }

    #[tokio::test]
    async fn verify_flags_missing_rows() {
        let pool = connect_ephemeral().await.expect("connect");
        schema::create_all(&pool).await.expect("schema");

        let verification = SeedDataset::verify(&pool).await.expect("verify");
        assert!(!verification.all_present);
        assert!(verification.checks.iter().any(|(name, passed)| *name == "unit-count" && !passed));
    }
}
