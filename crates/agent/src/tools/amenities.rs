use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use leasey_core::Amenity;
use leasey_db::repositories::SqlAmenityRepository;
use leasey_db::DbPool;

use super::{parse_args, Tool, ToolError};
use crate::session::{keys, SessionState};

/// Amenity listing with a derived by-category grouping for easier rendering.
pub struct GetAmenitiesInfo {
    amenities: SqlAmenityRepository,
}

#[derive(Debug, Default, Deserialize)]
struct GetAmenitiesInfoArgs {
    category: Option<String>,
}

impl GetAmenitiesInfo {
    pub fn new(pool: DbPool) -> Self {
        Self { amenities: SqlAmenityRepository::new(pool) }
    }
}

#[async_trait]
impl Tool for GetAmenitiesInfo {
    fn name(&self) -> &'static str {
        "get_amenities_info"
    }

    async fn call(&self, args: Value, session: &mut SessionState) -> Result<Value, ToolError> {
        let args: GetAmenitiesInfoArgs = parse_args(args)?;
        let amenities = self.amenities.list(args.category.as_deref()).await?;

        let mut categories: BTreeMap<String, Vec<&Amenity>> = BTreeMap::new();
        for amenity in &amenities {
            categories.entry(amenity.category.clone()).or_default().push(amenity);
        }

        session.insert(
            keys::LAST_AMENITIES_QUERY,
            json!({
                "category": args.category,
                "result_count": amenities.len(),
            }),
        );

        Ok(json!({
            "amenities_count": amenities.len(),
            "amenities": amenities,
            "categories": categories,
        }))
    }
}
