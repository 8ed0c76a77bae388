use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use leasey_core::{ProspectId, UnitId};
use leasey_db::repositories::{SqlTourRepository, SqlUnitRepository};
use leasey_db::DbPool;

use super::{Tool, ToolError};
use crate::nl::{normalize_tour_time, Clock, RelativeDateParser};
use crate::session::{keys, SessionState};

/// Books a property tour for the conversation's current prospect. Date
/// parsing failures short-circuit before time parsing and before any store
/// access; a type without an explicit unit picks the first available unit of
/// that type in storage order.
pub struct ScheduleTour {
    tours: SqlTourRepository,
    units: SqlUnitRepository,
    dates: RelativeDateParser,
}

#[derive(Debug, Deserialize)]
struct ScheduleTourArgs {
    tour_date: String,
    tour_time: String,
    #[serde(default)]
    is_virtual: Option<bool>,
    #[serde(default)]
    unit_id: Option<i64>,
    #[serde(default)]
    unit_type: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl ScheduleTour {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            tours: SqlTourRepository::new(pool.clone()),
            units: SqlUnitRepository::new(pool),
            dates: RelativeDateParser::new(clock),
        }
    }
}

#[async_trait]
impl Tool for ScheduleTour {
    fn name(&self) -> &'static str {
        "schedule_tour"
    }

    async fn call(&self, args: Value, session: &mut SessionState) -> Result<Value, ToolError> {
        let args: ScheduleTourArgs = serde_json::from_value(args)?;

        let Some(prospect_id) = session.current_prospect_id() else {
            return Err(ToolError::MissingPrecondition(
                "No prospect identified. Please provide contact information first.".to_string(),
            ));
        };

        let tour_date = self.dates.resolve(&args.tour_date)?;
        let tour_time = normalize_tour_time(&args.tour_time)?;

        let mut unit_id = args.unit_id.map(UnitId);
        if unit_id.is_none() {
            if let Some(unit_type) = args.unit_type.as_deref() {
                unit_id = self
                    .units
                    .list_available(Some(unit_type), None)
                    .await?
                    .first()
                    .map(|unit| unit.id);
            }
        }

        let is_virtual = args.is_virtual.unwrap_or(false);
        let tour_id = self
            .tours
            .schedule(
                &ProspectId(prospect_id),
                &tour_date,
                &tour_time,
                unit_id,
                is_virtual,
                args.notes.as_deref(),
            )
            .await?;

        let unit = match unit_id {
            Some(unit_id) => self.units.find_by_id(unit_id).await?.map(|unit| {
                json!({
                    "unit_number": unit.unit_number,
                    "unit_type": unit.unit_type,
                    "floor_plan": unit.floor_plan,
                    "bedrooms": unit.bedrooms,
                    "bathrooms": unit.bathrooms,
                })
            }),
            None => None,
        };

        session.insert(
            keys::LAST_SCHEDULED_TOUR,
            json!({
                "tour_id": tour_id,
                "tour_date": tour_date,
                "tour_time": tour_time,
                "unit_id": unit_id,
                "unit_type": args.unit_type,
                "is_virtual": is_virtual,
            }),
        );

        Ok(json!({
            "tour_id": tour_id,
            "tour_date": tour_date,
            "tour_time": tour_time,
            "is_virtual": is_virtual,
            "unit": unit,
            "message": "Tour scheduled successfully",
        }))
    }
}

/// Walkthrough links per unit type. Two entries, fixed at build time.
pub const VIRTUAL_TOUR_LINKS: &[(&str, &str)] = &[
    ("1_bedroom", "https://photos.app.goo.gl/tzHkairchH2cBTQq6"),
    ("2_bedroom", "https://photos.app.goo.gl/w9ARXbSUDza57eFS6"),
];

#[derive(Debug, Default)]
pub struct GetVirtualTour;

#[derive(Debug, Deserialize)]
struct GetVirtualTourArgs {
    unit_type: String,
}

#[async_trait]
impl Tool for GetVirtualTour {
    fn name(&self) -> &'static str {
        "get_virtual_tour"
    }

    async fn call(&self, args: Value, _session: &mut SessionState) -> Result<Value, ToolError> {
        let args: GetVirtualTourArgs = serde_json::from_value(args)?;

        let link = VIRTUAL_TOUR_LINKS
            .iter()
            .find(|(unit_type, _)| *unit_type == args.unit_type)
            .map(|(_, link)| *link)
            .ok_or_else(|| {
                ToolError::NotFound(format!(
                    "No virtual tour available for {}",
                    args.unit_type
                ))
            })?;

        Ok(json!({
            "tour_link": link,
            "unit_type": args.unit_type,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use super::{GetVirtualTour, ScheduleTour};
    use crate::nl::FixedClock;
    use crate::session::{keys, SessionState};
    use crate::tools::prospects::CreateProspect;
    use crate::tools::{Tool, ToolError};

    async fn seeded_pool() -> leasey_db::DbPool {
        let pool = leasey_db::connect_ephemeral().await.expect("connect");
        leasey_db::schema::create_all(&pool).await.expect("schema");
        leasey_db::SeedDataset::load(&pool).await.expect("seed");
        pool
    }

    fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 6, 14).expect("date")))
    }

    async fn with_prospect(pool: &leasey_db::DbPool) -> SessionState {
        let mut session = SessionState::new();
        CreateProspect::new(pool.clone())
            .call(json!({"name": "Mark"}), &mut session)
            .await
            .expect("create prospect");
        session
    }

    async fn tour_count(pool: &leasey_db::DbPool) -> i64 {
        leasey_db::repositories::SqlTourRepository::new(pool.clone())
            .count()
            .await
            .expect("count")
    }

    #[tokio::test]
    async fn scheduling_without_a_prospect_creates_no_rows() {
        let pool = seeded_pool().await;
        let tool = ScheduleTour::new(pool.clone(), fixed_clock());
        let mut session = SessionState::new();

        let error = tool
            .call(json!({"tour_date": "tomorrow", "tour_time": "3pm"}), &mut session)
            .await
            .expect_err("no prospect established");
        assert!(matches!(error, ToolError::MissingPrecondition(_)));
        assert_eq!(tour_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn schedules_tomorrow_with_first_available_unit_of_type() {
        let pool = seeded_pool().await;
        let mut session = with_prospect(&pool).await;
        let tool = ScheduleTour::new(pool.clone(), fixed_clock());

        let payload = tool
            .call(
                json!({"tour_date": "tomorrow", "tour_time": "3pm", "unit_type": "1_bedroom"}),
                &mut session,
            )
            .await
            .expect("schedule");

        assert_eq!(payload["tour_date"], "2025-06-15");
        assert_eq!(payload["tour_time"], "15:00");
        assert_eq!(payload["is_virtual"], false);
        assert_eq!(payload["unit"]["unit_number"], "101");
        assert_eq!(payload["unit"]["unit_type"], "1_bedroom");

        let recorded = session.get(keys::LAST_SCHEDULED_TOUR).expect("session record");
        assert_eq!(recorded["unit_id"], 101);
        assert_eq!(recorded["tour_time"], "15:00");
        assert_eq!(tour_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn explicit_unit_id_wins_over_type_selection() {
        let pool = seeded_pool().await;
        let mut session = with_prospect(&pool).await;
        let tool = ScheduleTour::new(pool.clone(), fixed_clock());

        let payload = tool
            .call(
                json!({
                    "tour_date": "next week",
                    "tour_time": "9:30am",
                    "unit_id": 302,
                    "unit_type": "1_bedroom",
                    "is_virtual": true,
                }),
                &mut session,
            )
            .await
            .expect("schedule");

        assert_eq!(payload["tour_date"], "2025-06-21");
        assert_eq!(payload["tour_time"], "09:30");
        assert_eq!(payload["is_virtual"], true);
        assert_eq!(payload["unit"]["unit_number"], "302");
    }

    #[tokio::test]
    async fn unparseable_time_short_circuits_before_any_insert() {
        let pool = seeded_pool().await;
        let mut session = with_prospect(&pool).await;
        let tool = ScheduleTour::new(pool.clone(), fixed_clock());

        let error = tool
            .call(json!({"tour_date": "tomorrow", "tour_time": "noonpm"}), &mut session)
            .await
            .expect_err("bad time literal");
        assert!(matches!(error, ToolError::UnparseableTime(_)));
        assert_eq!(tour_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn canonical_date_and_time_pass_through_to_the_booking() {
        let pool = seeded_pool().await;
        let mut session = with_prospect(&pool).await;
        let tool = ScheduleTour::new(pool.clone(), fixed_clock());

        let payload = tool
            .call(
                json!({"tour_date": "2025-07-04", "tour_time": "14:00", "is_virtual": true}),
                &mut session,
            )
            .await
            .expect("schedule");

        assert_eq!(payload["tour_date"], "2025-07-04");
        assert_eq!(payload["tour_time"], "14:00");
        assert_eq!(payload["unit"], Value::Null);
    }

    #[tokio::test]
    async fn virtual_tour_links_cover_both_types() {
        let tool = GetVirtualTour;
        let mut session = SessionState::new();

        let one = tool
            .call(json!({"unit_type": "1_bedroom"}), &mut session)
            .await
            .expect("lookup");
        assert_eq!(one["tour_link"], "https://photos.app.goo.gl/tzHkairchH2cBTQq6");

        let two = tool
            .call(json!({"unit_type": "2_bedroom"}), &mut session)
            .await
            .expect("lookup");
        assert_eq!(two["tour_link"], "https://photos.app.goo.gl/w9ARXbSUDza57eFS6");
    }

    #[tokio::test]
    async fn virtual_tour_miss_is_a_not_found_payload() {
        let tool = GetVirtualTour;
        let mut session = SessionState::new();

        let error = tool
            .call(json!({"unit_type": "studio"}), &mut session)
            .await
            .expect_err("no studio link");
        assert!(error.to_string().contains("studio"));
    }
}
