use chrono::{DateTime, Utc};
use leasey_core::{NewProspect, Prospect, ProspectId, ProspectPatch};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::RepositoryError;
use crate::DbPool;

const PROSPECT_COLUMNS: &str = "prospect_id, name, phone, email, move_in_date, \
     preferred_unit_type, has_pets, income, credit_score, notes, created_at, last_contact";

#[derive(Clone)]
pub struct SqlProspectRepository {
    pool: DbPool,
}

impl SqlProspectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new lead under a freshly generated token. `created_at` and
    /// `last_contact` are both stamped with the call time.
    pub async fn create(&self, fields: NewProspect) -> Result<ProspectId, RepositoryError> {
        let prospect_id = ProspectId::generate();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO prospects (prospect_id, name, phone, email, move_in_date, \
             preferred_unit_type, has_pets, created_at, last_contact) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&prospect_id.0)
        .bind(&fields.name)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.move_in_date)
        .bind(&fields.preferred_unit_type)
        .bind(fields.has_pets)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(prospect_id)
    }

    /// Apply the filled slots of the patch and refresh `last_contact`.
    /// Returns `false` for an empty patch or an unknown id, never an error.
    pub async fn update(
        &self,
        id: &ProspectId,
        patch: &ProspectPatch,
    ) -> Result<bool, RepositoryError> {
        if patch.is_empty() {
            return Ok(false);
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        if patch.name.is_some() {
            assignments.push("name = ?");
        }
        if patch.phone.is_some() {
            assignments.push("phone = ?");
        }
        if patch.email.is_some() {
            assignments.push("email = ?");
        }
        if patch.move_in_date.is_some() {
            assignments.push("move_in_date = ?");
        }
        if patch.preferred_unit_type.is_some() {
            assignments.push("preferred_unit_type = ?");
        }
        if patch.has_pets.is_some() {
            assignments.push("has_pets = ?");
        }
        if patch.income.is_some() {
            assignments.push("income = ?");
        }
        if patch.credit_score.is_some() {
            assignments.push("credit_score = ?");
        }
        if patch.notes.is_some() {
            assignments.push("notes = ?");
        }
        assignments.push("last_contact = ?");

        let sql = format!(
            "UPDATE prospects SET {} WHERE prospect_id = ?",
            assignments.join(", ")
        );

        let mut query = sqlx::query(&sql);
        if let Some(name) = &patch.name {
            query = query.bind(name);
        }
        if let Some(phone) = &patch.phone {
            query = query.bind(phone);
        }
        if let Some(email) = &patch.email {
            query = query.bind(email);
        }
        if let Some(move_in_date) = &patch.move_in_date {
            query = query.bind(move_in_date);
        }
        if let Some(preferred_unit_type) = &patch.preferred_unit_type {
            query = query.bind(preferred_unit_type);
        }
        if let Some(has_pets) = patch.has_pets {
            query = query.bind(has_pets);
        }
        if let Some(income) = patch.income {
            query = query.bind(income);
        }
        if let Some(credit_score) = patch.credit_score {
            query = query.bind(credit_score);
        }
        if let Some(notes) = &patch.notes {
            query = query.bind(notes);
        }
        query = query.bind(Utc::now()).bind(&id.0);

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(&self, id: &ProspectId) -> Result<Option<Prospect>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PROSPECT_COLUMNS} FROM prospects WHERE prospect_id = ?"
        ))
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(decode_prospect).transpose()
    }
}

fn decode_prospect(row: &SqliteRow) -> Result<Prospect, RepositoryError> {
    Ok(Prospect {
        prospect_id: ProspectId(row.try_get("prospect_id")?),
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        move_in_date: row.try_get("move_in_date")?,
        preferred_unit_type: row.try_get("preferred_unit_type")?,
        has_pets: row.try_get("has_pets")?,
        income: row.try_get("income")?,
        credit_score: row.try_get("credit_score")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        last_contact: row.try_get::<DateTime<Utc>, _>("last_contact")?,
    })
}

#[cfg(test)]
mod tests {
    use leasey_core::{NewProspect, ProspectId, ProspectPatch};

    use super::SqlProspectRepository;
    use crate::{connect_ephemeral, fixtures::SeedDataset, schema, DbPool};

    async fn seeded_pool() -> DbPool {
        let pool = connect_ephemeral().await.expect("connect");
        schema::create_all(&pool).await.expect("schema");
        SeedDataset::load(&pool).await.expect("seed");
        pool
    }

    fn mark() -> NewProspect {
        NewProspect {
            name: Some("Mark".to_string()),
            phone: Some("555-0134".to_string()),
            email: None,
            move_in_date: Some("2025-07-01".to_string()),
            preferred_unit_type: Some("1_bedroom".to_string()),
            has_pets: Some(true),
        }
    }

    #[tokio::test]
    async fn created_prospect_reads_back_with_exactly_the_supplied_fields() {
        let prospects = SqlProspectRepository::new(seeded_pool().await);

        let id = prospects.create(mark()).await.expect("create");
        let stored = prospects.find_by_id(&id).await.expect("query").expect("prospect");

        assert_eq!(stored.prospect_id, id);
        assert_eq!(stored.name.as_deref(), Some("Mark"));
        assert_eq!(stored.phone.as_deref(), Some("555-0134"));
        assert_eq!(stored.email, None);
        assert_eq!(stored.move_in_date.as_deref(), Some("2025-07-01"));
        assert_eq!(stored.preferred_unit_type.as_deref(), Some("1_bedroom"));
        assert_eq!(stored.has_pets, Some(true));
        assert_eq!(stored.income, None);
        assert_eq!(stored.credit_score, None);
        assert_eq!(stored.notes, None);
        assert_eq!(stored.created_at, stored.last_contact);
    }

    #[tokio::test]
    async fn empty_patch_is_a_no_op_returning_false() {
        let prospects = SqlProspectRepository::new(seeded_pool().await);
        let id = prospects.create(mark()).await.expect("create");
        let before = prospects.find_by_id(&id).await.expect("query").expect("prospect");

        let updated = prospects.update(&id, &ProspectPatch::default()).await.expect("update");
        assert!(!updated);

        let after = prospects.find_by_id(&id).await.expect("query").expect("prospect");
        assert_eq!(before, after, "empty patch must not touch the row");
    }

    #[tokio::test]
    async fn patch_changes_only_supplied_fields_and_advances_last_contact() {
        let prospects = SqlProspectRepository::new(seeded_pool().await);
        let id = prospects.create(mark()).await.expect("create");
        let before = prospects.find_by_id(&id).await.expect("query").expect("prospect");

        let patch = ProspectPatch {
            income: Some(82_000.0),
            credit_score: Some(735),
            ..ProspectPatch::default()
        };
        let updated = prospects.update(&id, &patch).await.expect("update");
        assert!(updated);

        let after = prospects.find_by_id(&id).await.expect("query").expect("prospect");
        assert_eq!(after.income, Some(82_000.0));
        assert_eq!(after.credit_score, Some(735));
        assert_eq!(after.name, before.name);
        assert_eq!(after.move_in_date, before.move_in_date);
        assert_eq!(after.has_pets, before.has_pets);
        assert!(after.last_contact >= before.last_contact);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn updating_unknown_prospect_returns_false_not_error() {
        let prospects = SqlProspectRepository::new(seeded_pool().await);

        let patch = ProspectPatch { name: Some("Nobody".to_string()), ..ProspectPatch::default() };
        let updated = prospects
            .update(&ProspectId("no-such-token".to_string()), &patch)
            .await
            .expect("update");
        assert!(!updated);
    }

    #[tokio::test]
    async fn unknown_prospect_reads_back_as_none() {
        let prospects = SqlProspectRepository::new(seeded_pool().await);
        let missing = prospects
            .find_by_id(&ProspectId("no-such-token".to_string()))
            .await
            .expect("query");
        assert!(missing.is_none());
    }
}
