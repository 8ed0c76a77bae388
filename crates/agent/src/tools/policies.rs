use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use leasey_db::repositories::{SqlAmenityRepository, SqlUnitRepository};
use leasey_db::DbPool;

use super::{round2, Tool, ToolError};
use crate::session::{keys, SessionState};

/// Derives the property's standing policies from the store: pet rules from
/// the `Pets` amenity category, rent ranges per unit type, and current
/// availability counts. Always succeeds and caches its result in session
/// state for later turns.
pub struct GetPropertyPolicies {
    amenities: SqlAmenityRepository,
    units: SqlUnitRepository,
}

impl GetPropertyPolicies {
    pub fn new(pool: DbPool) -> Self {
        Self {
            amenities: SqlAmenityRepository::new(pool.clone()),
            units: SqlUnitRepository::new(pool),
        }
    }
}

#[async_trait]
impl Tool for GetPropertyPolicies {
    fn name(&self) -> &'static str {
        "get_property_policies"
    }

    async fn call(&self, _args: Value, session: &mut SessionState) -> Result<Value, ToolError> {
        let mut pet_policies = Map::new();
        for amenity in self.amenities.list(Some("Pets")).await? {
            pet_policies.insert(
                animal_key(&amenity.name),
                json!({
                    "allowed": amenity.is_included,
                    "fee": amenity.fee_amount,
                    "description": amenity.description,
                }),
            );
        }

        let mut pricing_ranges = Map::new();
        for summary in self.units.pricing_summary(None).await? {
            pricing_ranges.insert(
                summary.unit_type.as_str().to_string(),
                json!({
                    "min": summary.min_rent,
                    "max": summary.max_rent,
                    "average": round2(summary.mean_rent),
                }),
            );
        }

        let mut availability: BTreeMap<String, i64> = BTreeMap::new();
        for unit in self.units.list_available(None, None).await? {
            *availability.entry(unit.unit_type.as_str().to_string()).or_default() += 1;
        }

        let payload = json!({
            "pet_policies": pet_policies,
            "pricing_ranges": pricing_ranges,
            "availability": availability,
        });
        session.insert(keys::PROPERTY_POLICIES, payload.clone());
        Ok(payload)
    }
}

/// `"Dog-friendly"` → `"dog"`: the animal is the name's leading token
/// before the separator.
fn animal_key(amenity_name: &str) -> String {
    amenity_name.split('-').next().unwrap_or(amenity_name).trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::{animal_key, GetPropertyPolicies};
    use crate::session::{keys, SessionState};
    use crate::tools::Tool;

    async fn tool() -> GetPropertyPolicies {
        let pool = leasey_db::connect_ephemeral().await.expect("connect");
        leasey_db::schema::create_all(&pool).await.expect("schema");
        leasey_db::SeedDataset::load(&pool).await.expect("seed");
        GetPropertyPolicies::new(pool)
    }

    #[test]
    fn animal_key_takes_the_leading_token() {
        assert_eq!(animal_key("Dog-friendly"), "dog");
        assert_eq!(animal_key("Cat-friendly"), "cat");
        assert_eq!(animal_key("Birds"), "birds");
    }

    #[tokio::test]
    async fn derives_policies_from_seed_data() {
        let mut session = SessionState::new();
        let payload = tool().await.call(Value::Null, &mut session).await.expect("call");

        assert_eq!(payload["pet_policies"]["dog"]["allowed"], true);
        assert_eq!(payload["pet_policies"]["dog"]["fee"], 50.0);
        assert_eq!(payload["pet_policies"]["cat"]["fee"], 30.0);

        assert_eq!(payload["pricing_ranges"]["1_bedroom"]["min"], 1600.0);
        assert_eq!(payload["pricing_ranges"]["1_bedroom"]["max"], 1650.0);
        assert_eq!(payload["pricing_ranges"]["1_bedroom"]["average"], 1625.0);
        assert_eq!(payload["pricing_ranges"]["2_bedroom"]["average"], 2150.0);

        assert_eq!(payload["availability"]["1_bedroom"], 2);
        assert_eq!(payload["availability"]["2_bedroom"], 2);
    }

    #[tokio::test]
    async fn caches_the_result_in_session_state() {
        let mut session = SessionState::new();
        let payload = tool().await.call(Value::Null, &mut session).await.expect("call");

        assert_eq!(session.get(keys::PROPERTY_POLICIES), Some(&payload));
    }
}
