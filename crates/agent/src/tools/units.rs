use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use leasey_core::UnitId;
use leasey_db::repositories::SqlUnitRepository;
use leasey_db::DbPool;

use super::{parse_args, round2, Tool, ToolError};
use crate::nl::MoveInMonthTable;
use crate::session::{keys, SessionState};

/// Availability search over the unit inventory, with the move-in hint mapped
/// through the fixed month table before filtering.
pub struct QueryUnits {
    units: SqlUnitRepository,
    months: MoveInMonthTable,
}

#[derive(Debug, Default, Deserialize)]
struct QueryUnitsArgs {
    unit_type: Option<String>,
    move_in: Option<String>,
}

impl QueryUnits {
    pub fn new(pool: DbPool) -> Self {
        Self { units: SqlUnitRepository::new(pool), months: MoveInMonthTable }
    }
}

#[async_trait]
impl Tool for QueryUnits {
    fn name(&self) -> &'static str {
        "query_units"
    }

    async fn call(&self, args: Value, session: &mut SessionState) -> Result<Value, ToolError> {
        let args: QueryUnitsArgs = parse_args(args)?;
        let resolved_move_in = args.move_in.as_deref().map(|hint| self.months.resolve(hint));

        let units = self
            .units
            .list_available(args.unit_type.as_deref(), resolved_move_in.as_deref())
            .await?;

        let mut counts_by_type: BTreeMap<String, i64> = BTreeMap::new();
        for unit in &units {
            *counts_by_type.entry(unit.unit_type.as_str().to_string()).or_default() += 1;
        }

        session.insert(
            keys::LAST_UNIT_SEARCH,
            json!({
                "unit_type": args.unit_type,
                "move_in": args.move_in,
                "resolved_move_in": resolved_move_in,
                "result_count": units.len(),
                "counts_by_type": counts_by_type,
            }),
        );

        Ok(json!({
            "available_count": units.len(),
            "counts_by_type": counts_by_type,
            "units": units,
        }))
    }
}

/// Three-way detail lookup: an explicit unit id wins, then a type's pricing
/// range, then the full pricing table.
pub struct GetUnitDetails {
    units: SqlUnitRepository,
}

#[derive(Debug, Default, Deserialize)]
struct GetUnitDetailsArgs {
    unit_id: Option<i64>,
    unit_type: Option<String>,
}

impl GetUnitDetails {
    pub fn new(pool: DbPool) -> Self {
        Self { units: SqlUnitRepository::new(pool) }
    }
}

#[async_trait]
impl Tool for GetUnitDetails {
    fn name(&self) -> &'static str {
        "get_unit_details"
    }

    async fn call(&self, args: Value, session: &mut SessionState) -> Result<Value, ToolError> {
        let args: GetUnitDetailsArgs = parse_args(args)?;

        let payload = if let Some(unit_id) = args.unit_id {
            let unit = self
                .units
                .find_by_id(UnitId(unit_id))
                .await?
                .ok_or_else(|| ToolError::NotFound(format!("No unit found with ID {unit_id}")))?;
            json!({ "unit": unit })
        } else if let Some(unit_type) = args.unit_type.as_deref() {
            let summary = self
                .units
                .pricing_summary(Some(unit_type))
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    ToolError::NotFound(format!("No pricing information found for {unit_type}"))
                })?;
            json!({
                "unit_type": unit_type,
                "pricing": {
                    "min": summary.min_rent,
                    "max": summary.max_rent,
                    "average": round2(summary.mean_rent),
                },
            })
        } else {
            let mut pricing_by_type = Map::new();
            for summary in self.units.pricing_summary(None).await? {
                pricing_by_type.insert(
                    summary.unit_type.as_str().to_string(),
                    json!({
                        "min_rent": summary.min_rent,
                        "max_rent": summary.max_rent,
                        "mean_rent": summary.mean_rent,
                        "count": summary.count,
                    }),
                );
            }
            json!({ "pricing_by_type": pricing_by_type })
        };

        session.insert(keys::LAST_UNIT_DETAILS, payload.clone());
        Ok(payload)
    }
}
