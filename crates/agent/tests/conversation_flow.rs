//! End-to-end pass over the tool registry, mirroring the turns an engine
//! takes for a typical renter conversation: establish the prospect, search
//! availability, then book a tour.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};

use leasey_agent::nl::FixedClock;
use leasey_agent::session::{keys, SessionState};
use leasey_agent::tools::{standard_registry, ToolRegistry};
use leasey_db::repositories::{SqlProspectRepository, SqlTourRepository};
use leasey_db::DbPool;

const TODAY: (i32, u32, u32) = (2025, 6, 14);

async fn conversation() -> (ToolRegistry, DbPool) {
    let pool = leasey_db::connect_ephemeral().await.expect("connect");
    leasey_db::schema::create_all(&pool).await.expect("schema");
    leasey_db::SeedDataset::load(&pool).await.expect("seed");

    let clock = FixedClock(
        NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).expect("fixed date"),
    );
    let registry = standard_registry(&pool, Arc::new(clock));
    (registry, pool)
}

#[tokio::test]
async fn mark_books_a_one_bedroom_tour_for_tomorrow() {
    let (registry, pool) = conversation().await;
    let mut session = SessionState::new();

    // Turn 1: the engine pulls standing policies up front.
    let policies = registry
        .dispatch("get_property_policies", Value::Null, &mut session)
        .await;
    assert_eq!(policies["status"], "success");
    assert_eq!(policies["pet_policies"]["dog"]["allowed"], true);

    // Turn 2: "My name is Mark" → create the prospect.
    let created = registry
        .dispatch("create_prospect", json!({"name": "Mark"}), &mut session)
        .await;
    assert_eq!(created["status"], "success");
    let prospect_id = created["prospect_id"].as_str().expect("prospect id").to_string();
    assert_eq!(session.current_prospect_id().as_deref(), Some(prospect_id.as_str()));

    // Turn 3: "moving in July, one bedroom" → availability filtered by the
    // resolved 2025-07-01 bound.
    let search = registry
        .dispatch(
            "query_units",
            json!({"unit_type": "1_bedroom", "move_in": "july"}),
            &mut session,
        )
        .await;
    assert_eq!(search["status"], "success");
    assert_eq!(search["available_count"], 1);
    assert_eq!(search["units"][0]["id"], 101);
    assert_eq!(
        session.get(keys::LAST_UNIT_SEARCH).expect("search echo")["resolved_move_in"],
        "2025-07-01"
    );

    // Turn 4: "tour tomorrow at 3pm" with no explicit unit → first available
    // 1_bedroom in storage order gets attached.
    let booked = registry
        .dispatch(
            "schedule_tour",
            json!({"tour_date": "tomorrow", "tour_time": "3pm", "unit_type": "1_bedroom"}),
            &mut session,
        )
        .await;
    assert_eq!(booked["status"], "success");
    assert_eq!(booked["tour_date"], "2025-06-15");
    assert_eq!(booked["tour_time"], "15:00");
    assert_eq!(booked["unit"]["unit_number"], "101");

    // The booking row matches what the engine was told.
    let bookings = SqlTourRepository::new(pool.clone())
        .list_for_prospect(&leasey_core::ProspectId(prospect_id.clone()))
        .await
        .expect("list bookings");
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].tour_date, "2025-06-15");
    assert_eq!(bookings[0].tour_time, "15:00");
    assert_eq!(bookings[0].status, leasey_core::TourStatus::Scheduled);
    assert_eq!(bookings[0].unit_number.as_deref(), Some("101"));

    // And the prospect record still reads back exactly as created.
    let stored = SqlProspectRepository::new(pool)
        .find_by_id(&leasey_core::ProspectId(prospect_id))
        .await
        .expect("find prospect")
        .expect("prospect exists");
    assert_eq!(stored.name.as_deref(), Some("Mark"));
    assert_eq!(stored.email, None);
}

#[tokio::test]
async fn scheduling_before_introducing_yourself_fails_without_side_effects() {
    let (registry, pool) = conversation().await;
    let mut session = SessionState::new();

    let reply = registry
        .dispatch(
            "schedule_tour",
            json!({"tour_date": "tomorrow", "tour_time": "3pm"}),
            &mut session,
        )
        .await;
    assert_eq!(reply["status"], "error");
    assert!(reply["message"]
        .as_str()
        .expect("message")
        .contains("No prospect identified"));

    let count = SqlTourRepository::new(pool).count().await.expect("count");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn qualification_details_flow_through_update_and_get() {
    let (registry, _pool) = conversation().await;
    let mut session = SessionState::new();

    registry
        .dispatch("create_prospect", json!({"name": "Mark"}), &mut session)
        .await;

    let updated = registry
        .dispatch(
            "update_prospect",
            json!({"income": 82000.0, "credit_score": 735}),
            &mut session,
        )
        .await;
    assert_eq!(updated["status"], "success");

    let fetched = registry.dispatch("get_prospect", Value::Null, &mut session).await;
    assert_eq!(fetched["status"], "success");
    assert_eq!(fetched["prospect"]["income"], 82000.0);
    assert_eq!(fetched["prospect"]["credit_score"], 735);
}
