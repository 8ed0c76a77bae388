use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

use leasey_db::repositories::RepositoryError;
use leasey_db::DbPool;

use crate::nl::{Clock, NlParseError};
use crate::session::SessionState;

pub mod amenities;
pub mod policies;
pub mod prospects;
pub mod tours;
pub mod units;

pub use amenities::GetAmenitiesInfo;
pub use policies::GetPropertyPolicies;
pub use prospects::{CreateProspect, GetProspect, UpdateProspect};
pub use tours::{GetVirtualTour, ScheduleTour};
pub use units::{GetUnitDetails, QueryUnits};

/// Every expected business failure becomes one of these and is rendered as
/// an error payload; tools never panic and never raise for them.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    MissingPrecondition(String),
    #[error("could not parse tour date: {0}")]
    UnparseableDate(String),
    #[error("could not parse tour time: {0}")]
    UnparseableTime(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

impl From<NlParseError> for ToolError {
    fn from(error: NlParseError) -> Self {
        match error {
            NlParseError::Date(literal) => Self::UnparseableDate(literal),
            NlParseError::Time(literal) => Self::UnparseableTime(literal),
        }
    }
}

/// A named operation the dialogue engine can invoke. Arguments arrive as the
/// loosely-structured JSON the engine derived from the utterance; the
/// session bag is mutated in place.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    async fn call(&self, args: Value, session: &mut SessionState) -> Result<Value, ToolError>;
}

/// The full tool inventory, in dispatch-name order.
pub const ALL_TOOL_NAMES: &[&str] = &[
    "create_prospect",
    "get_amenities_info",
    "get_property_policies",
    "get_prospect",
    "get_unit_details",
    "get_virtual_tour",
    "query_units",
    "schedule_tour",
    "update_prospect",
];

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invoke a tool by name and wrap the outcome into the response
    /// envelope. Unknown names and tool errors both come back as data.
    pub async fn dispatch(&self, name: &str, args: Value, session: &mut SessionState) -> Value {
        let Some(tool) = self.tools.get(name) else {
            return error_envelope(format!("unknown tool: {name}"));
        };

        debug!(tool = name, "dispatching tool call");
        match tool.call(args, session).await {
            Ok(payload) => success_envelope(payload),
            Err(error) => {
                debug!(tool = name, error = %error, "tool returned error payload");
                error_envelope(error.to_string())
            }
        }
    }
}

/// Build the registry the engine is given for one conversation. The clock is
/// injected so relative tour dates stay testable.
pub fn standard_registry(pool: &DbPool, clock: Arc<dyn Clock>) -> ToolRegistry {
    let mut registry = ToolRegistry::default();
    registry.register(GetPropertyPolicies::new(pool.clone()));
    registry.register(QueryUnits::new(pool.clone()));
    registry.register(GetUnitDetails::new(pool.clone()));
    registry.register(GetAmenitiesInfo::new(pool.clone()));
    registry.register(CreateProspect::new(pool.clone()));
    registry.register(UpdateProspect::new(pool.clone()));
    registry.register(GetProspect::new(pool.clone()));
    registry.register(ScheduleTour::new(pool.clone(), clock));
    registry.register(GetVirtualTour::default());
    registry
}

fn success_envelope(payload: Value) -> Value {
    let mut object = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            map
        }
    };
    object.insert("status".to_string(), Value::String("success".to_string()));
    Value::Object(object)
}

fn error_envelope(message: impl Into<String>) -> Value {
    json!({ "status": "error", "message": message.into() })
}

/// Deserialize engine-supplied arguments, treating `null` as "no arguments".
/// Unknown keys are ignored, matching the permissive argument contract.
pub(crate) fn parse_args<T>(args: Value) -> Result<T, ToolError>
where
    T: DeserializeOwned + Default,
{
    if args.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(args)?)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::{standard_registry, ToolRegistry, ALL_TOOL_NAMES};
    use crate::nl::SystemClock;
    use crate::session::SessionState;

    async fn seeded_registry() -> ToolRegistry {
        let pool = leasey_db::connect_ephemeral().await.expect("connect");
        leasey_db::schema::create_all(&pool).await.expect("schema");
        leasey_db::SeedDataset::load(&pool).await.expect("seed");
        standard_registry(&pool, Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn standard_registry_covers_the_full_inventory() {
        let registry = seeded_registry().await;
        assert_eq!(registry.names(), ALL_TOOL_NAMES);
        assert_eq!(registry.len(), ALL_TOOL_NAMES.len());
    }

    #[tokio::test]
    async fn unknown_tool_dispatch_returns_error_envelope() {
        let registry = seeded_registry().await;
        let mut session = SessionState::new();

        let reply = registry.dispatch("approve_lease", Value::Null, &mut session).await;
        assert_eq!(reply["status"], "error");
        assert!(reply["message"].as_str().expect("message").contains("approve_lease"));
        assert!(session.is_empty(), "failed dispatch must not touch session state");
    }

    #[tokio::test]
    async fn success_envelope_tags_the_payload() {
        let registry = seeded_registry().await;
        let mut session = SessionState::new();

        let reply = registry.dispatch("get_property_policies", Value::Null, &mut session).await;
        assert_eq!(reply["status"], "success");
        assert!(reply.get("pet_policies").is_some());
    }

    #[tokio::test]
    async fn malformed_arguments_become_error_payloads() {
        let registry = seeded_registry().await;
        let mut session = SessionState::new();

        let reply = registry
            .dispatch("query_units", json!({"unit_type": 17}), &mut session)
            .await;
        assert_eq!(reply["status"], "error");
        assert!(reply["message"].as_str().expect("message").contains("invalid arguments"));
    }
}
