use crate::DbPool;

/// The store is rebuilt from seed on every process start, so the schema is
/// applied directly instead of through versioned migrations.
const DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS units (
        id INTEGER PRIMARY KEY,
        unit_number TEXT NOT NULL,
        unit_type TEXT NOT NULL,
        floor_plan TEXT NOT NULL,
        square_feet INTEGER NOT NULL,
        bedrooms INTEGER NOT NULL,
        bathrooms REAL NOT NULL,
        rent_amount REAL NOT NULL,
        is_available INTEGER NOT NULL,
        available_date TEXT NOT NULL,
        features TEXT
    )",
    "CREATE TABLE IF NOT EXISTS prospects (
        prospect_id TEXT PRIMARY KEY,
        name TEXT,
        phone TEXT,
        email TEXT,
        move_in_date TEXT,
        preferred_unit_type TEXT,
        has_pets INTEGER,
        income REAL,
        credit_score INTEGER,
        notes TEXT,
        created_at TEXT NOT NULL,
        last_contact TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS amenities (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT NOT NULL,
        fee_amount REAL NOT NULL,
        is_included INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tours (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        prospect_id TEXT NOT NULL REFERENCES prospects (prospect_id),
        tour_date TEXT NOT NULL,
        tour_time TEXT NOT NULL,
        unit_id INTEGER REFERENCES units (id),
        is_virtual INTEGER NOT NULL,
        status TEXT NOT NULL,
        notes TEXT
    )",
];

pub async fn create_all(pool: &DbPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in DDL {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::create_all;
    use crate::connect_ephemeral;

    const TABLES: &[&str] = &["units", "prospects", "amenities", "tours"];

    #[tokio::test]
    async fn schema_creates_all_tables() {
        let pool = connect_ephemeral().await.expect("connect");
        create_all(&pool).await.expect("create schema");

        for table in TABLES {
            let count = sqlx::query(
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .expect("check table")
            .get::<i64, _>("count");
            assert_eq!(count, 1, "table `{table}` should exist");
        }
    }

    #[tokio::test]
    async fn schema_application_is_idempotent() {
        let pool = connect_ephemeral().await.expect("connect");
        create_all(&pool).await.expect("first pass");
        create_all(&pool).await.expect("second pass");
    }
}
