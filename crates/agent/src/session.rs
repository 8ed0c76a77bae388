use serde_json::{Map, Value};

/// Fixed keys the tools read and write. The external engine persists the bag
/// between turns but never interprets these entries itself.
pub mod keys {
    pub const PROPERTY_POLICIES: &str = "property_policies";
    pub const LAST_UNIT_SEARCH: &str = "last_unit_search";
    pub const LAST_UNIT_DETAILS: &str = "last_unit_details";
    pub const LAST_AMENITIES_QUERY: &str = "last_amenities_query";
    pub const CURRENT_PROSPECT_ID: &str = "current_prospect_id";
    pub const PROSPECT_INFO: &str = "prospect_info";
    pub const LAST_SCHEDULED_TOUR: &str = "last_scheduled_tour";
}

/// Per-conversation mutable state bag, passed `&mut` into every tool call.
/// A brand-new empty bag is always valid; tools populate it lazily.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    values: Map<String, Value>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.values
    }

    /// The prospect established earlier in the conversation, if any.
    pub fn current_prospect_id(&self) -> Option<String> {
        self.values
            .get(keys::CURRENT_PROSPECT_ID)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub fn set_current_prospect_id(&mut self, prospect_id: &str) {
        self.insert(keys::CURRENT_PROSPECT_ID, Value::String(prospect_id.to_string()));
    }

    /// Merge fields into an existing object entry. A no-op when the entry is
    /// absent or not an object; partial updates never create the snapshot.
    pub fn merge_object(&mut self, key: &str, fields: Map<String, Value>) {
        if let Some(Value::Object(existing)) = self.values.get_mut(key) {
            existing.extend(fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use super::{keys, SessionState};

    #[test]
    fn empty_bag_resolves_no_prospect() {
        let session = SessionState::new();
        assert!(session.is_empty());
        assert!(session.current_prospect_id().is_none());
    }

    #[test]
    fn current_prospect_round_trips() {
        let mut session = SessionState::new();
        session.set_current_prospect_id("token-1");
        assert_eq!(session.current_prospect_id().as_deref(), Some("token-1"));
    }

    #[test]
    fn merge_updates_existing_snapshot_fields() {
        let mut session = SessionState::new();
        session.insert(keys::PROSPECT_INFO, json!({"name": "Mark", "phone": null}));

        let mut changes = Map::new();
        changes.insert("phone".to_string(), Value::String("555-0134".to_string()));
        session.merge_object(keys::PROSPECT_INFO, changes);

        let snapshot = session.get(keys::PROSPECT_INFO).expect("snapshot");
        assert_eq!(snapshot["name"], "Mark");
        assert_eq!(snapshot["phone"], "555-0134");
    }

    #[test]
    fn merge_into_missing_snapshot_is_a_no_op() {
        let mut session = SessionState::new();

        let mut changes = Map::new();
        changes.insert("phone".to_string(), Value::String("555-0134".to_string()));
        session.merge_object(keys::PROSPECT_INFO, changes);

        assert!(session.get(keys::PROSPECT_INFO).is_none());
    }
}
