use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use leasey_core::{NewProspect, ProspectId, ProspectPatch};
use leasey_db::repositories::SqlProspectRepository;
use leasey_db::DbPool;

use super::{parse_args, Tool, ToolError};
use crate::nl::MoveInMonthTable;
use crate::session::{keys, SessionState};

/// Registers a new lead, remembers it as the conversation's current
/// prospect, and drops a denormalized snapshot into session state.
pub struct CreateProspect {
    prospects: SqlProspectRepository,
    months: MoveInMonthTable,
}

#[derive(Debug, Default, Deserialize)]
struct CreateProspectArgs {
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    move_in_date: Option<String>,
    preferred_unit_type: Option<String>,
    has_pets: Option<bool>,
}

impl CreateProspect {
    pub fn new(pool: DbPool) -> Self {
        Self { prospects: SqlProspectRepository::new(pool), months: MoveInMonthTable }
    }
}

#[async_trait]
impl Tool for CreateProspect {
    fn name(&self) -> &'static str {
        "create_prospect"
    }

    async fn call(&self, args: Value, session: &mut SessionState) -> Result<Value, ToolError> {
        let args: CreateProspectArgs = parse_args(args)?;
        let resolved_move_in =
            args.move_in_date.as_deref().map(|hint| self.months.resolve(hint));

        let prospect_id = self
            .prospects
            .create(NewProspect {
                name: args.name.clone(),
                phone: args.phone.clone(),
                email: args.email.clone(),
                move_in_date: resolved_move_in.clone(),
                preferred_unit_type: args.preferred_unit_type.clone(),
                has_pets: args.has_pets,
            })
            .await?;

        session.set_current_prospect_id(&prospect_id.0);
        session.insert(
            keys::PROSPECT_INFO,
            json!({
                "prospect_id": prospect_id,
                "name": args.name,
                "phone": args.phone,
                "email": args.email,
                "move_in_date": args.move_in_date,
                "resolved_move_in_date": resolved_move_in,
                "preferred_unit_type": args.preferred_unit_type,
                "has_pets": args.has_pets,
            }),
        );

        Ok(json!({
            "prospect_id": prospect_id,
            "message": "Prospect created successfully",
        }))
    }
}

/// Applies the supplied fields to an existing lead. The target id comes from
/// the argument or, failing that, the session's current prospect.
pub struct UpdateProspect {
    prospects: SqlProspectRepository,
    months: MoveInMonthTable,
}

#[derive(Debug, Default, Deserialize)]
struct UpdateProspectArgs {
    prospect_id: Option<String>,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    move_in_date: Option<String>,
    preferred_unit_type: Option<String>,
    has_pets: Option<bool>,
    income: Option<f64>,
    credit_score: Option<i64>,
    notes: Option<String>,
}

impl UpdateProspect {
    pub fn new(pool: DbPool) -> Self {
        Self { prospects: SqlProspectRepository::new(pool), months: MoveInMonthTable }
    }
}

#[async_trait]
impl Tool for UpdateProspect {
    fn name(&self) -> &'static str {
        "update_prospect"
    }

    async fn call(&self, args: Value, session: &mut SessionState) -> Result<Value, ToolError> {
        let args: UpdateProspectArgs = parse_args(args)?;
        let prospect_id = args
            .prospect_id
            .clone()
            .or_else(|| session.current_prospect_id())
            .ok_or_else(|| {
                ToolError::MissingPrecondition("No prospect ID provided for update".to_string())
            })?;

        let resolved_move_in =
            args.move_in_date.as_deref().map(|hint| self.months.resolve(hint));

        let patch = ProspectPatch {
            name: args.name.clone(),
            phone: args.phone.clone(),
            email: args.email.clone(),
            move_in_date: resolved_move_in.clone(),
            preferred_unit_type: args.preferred_unit_type.clone(),
            has_pets: args.has_pets,
            income: args.income,
            credit_score: args.credit_score,
            notes: args.notes.clone(),
        };

        let updated =
            self.prospects.update(&ProspectId(prospect_id.clone()), &patch).await?;
        if !updated {
            return Err(ToolError::NotFound(
                "Failed to update prospect information".to_string(),
            ));
        }

        session.merge_object(keys::PROSPECT_INFO, snapshot_changes(&args, resolved_move_in));
        Ok(json!({ "message": "Prospect updated successfully" }))
    }
}

fn snapshot_changes(args: &UpdateProspectArgs, resolved_move_in: Option<String>) -> Map<String, Value> {
    let mut changes = Map::new();
    if let Some(name) = &args.name {
        changes.insert("name".to_string(), json!(name));
    }
    if let Some(phone) = &args.phone {
        changes.insert("phone".to_string(), json!(phone));
    }
    if let Some(email) = &args.email {
        changes.insert("email".to_string(), json!(email));
    }
    if let Some(move_in_date) = &args.move_in_date {
        changes.insert("move_in_date".to_string(), json!(move_in_date));
        changes.insert("resolved_move_in_date".to_string(), json!(resolved_move_in));
    }
    if let Some(preferred_unit_type) = &args.preferred_unit_type {
        changes.insert("preferred_unit_type".to_string(), json!(preferred_unit_type));
    }
    if let Some(has_pets) = args.has_pets {
        changes.insert("has_pets".to_string(), json!(has_pets));
    }
    if let Some(income) = args.income {
        changes.insert("income".to_string(), json!(income));
    }
    if let Some(credit_score) = args.credit_score {
        changes.insert("credit_score".to_string(), json!(credit_score));
    }
    if let Some(notes) = &args.notes {
        changes.insert("notes".to_string(), json!(notes));
    }
    changes
}

/// Fetches the current record, refreshing the session snapshot from the
/// store on success. Same id resolution rule as updates.
pub struct GetProspect {
    prospects: SqlProspectRepository,
}

#[derive(Debug, Default, Deserialize)]
struct GetProspectArgs {
    prospect_id: Option<String>,
}

impl GetProspect {
    pub fn new(pool: DbPool) -> Self {
        Self { prospects: SqlProspectRepository::new(pool) }
    }
}

#[async_trait]
impl Tool for GetProspect {
    fn name(&self) -> &'static str {
        "get_prospect"
    }

    async fn call(&self, args: Value, session: &mut SessionState) -> Result<Value, ToolError> {
        let args: GetProspectArgs = parse_args(args)?;
        let prospect_id = args
            .prospect_id
            .or_else(|| session.current_prospect_id())
            .ok_or_else(|| {
                ToolError::MissingPrecondition(
                    "No prospect ID provided to retrieve prospect information".to_string(),
                )
            })?;

        let prospect = self
            .prospects
            .find_by_id(&ProspectId(prospect_id.clone()))
            .await?
            .ok_or_else(|| {
                ToolError::NotFound(format!("No prospect found with ID {prospect_id}"))
            })?;

        session.insert(keys::PROSPECT_INFO, json!(prospect));
        Ok(json!({ "prospect": prospect }))
    }
}
