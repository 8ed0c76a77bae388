use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique token handed back to the dialogue engine at creation time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProspectId(pub String);

impl ProspectId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for ProspectId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A rental lead. Every contact field is optional; the conversation fills
/// them in across turns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub prospect_id: ProspectId,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub move_in_date: Option<String>,
    pub preferred_unit_type: Option<String>,
    pub has_pets: Option<bool>,
    pub income: Option<f64>,
    pub credit_score: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_contact: DateTime<Utc>,
}

/// Fields accepted at creation time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProspect {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub move_in_date: Option<String>,
    pub preferred_unit_type: Option<String>,
    pub has_pets: Option<bool>,
}

/// Partial update with one optional slot per updatable attribute. A `None`
/// slot leaves the stored value untouched; there is no way to clear a field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProspectPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub move_in_date: Option<String>,
    pub preferred_unit_type: Option<String>,
    pub has_pets: Option<bool>,
    pub income: Option<f64>,
    pub credit_score: Option<i64>,
    pub notes: Option<String>,
}

impl ProspectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.move_in_date.is_none()
            && self.preferred_unit_type.is_none()
            && self.has_pets.is_none()
            && self.income.is_none()
            && self.credit_score.is_none()
            && self.notes.is_none()
    }
}
