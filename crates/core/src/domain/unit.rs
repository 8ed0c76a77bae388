use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub i64);

/// Floor-plan categories offered by the property. Stored as the snake_case
/// strings the dialogue engine uses (`1_bedroom`, `2_bedroom`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    #[serde(rename = "1_bedroom")]
    OneBedroom,
    #[serde(rename = "2_bedroom")]
    TwoBedroom,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneBedroom => "1_bedroom",
            Self::TwoBedroom => "2_bedroom",
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "1_bedroom" => Ok(Self::OneBedroom),
            "2_bedroom" => Ok(Self::TwoBedroom),
            other => Err(DomainError::UnknownUnitType(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_number: String,
    pub unit_type: UnitType,
    pub floor_plan: String,
    pub square_feet: i64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub rent_amount: f64,
    pub is_available: bool,
    pub available_date: NaiveDate,
    pub features: Option<String>,
}

/// Per-type rent aggregate over every unit of that type, available or not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingSummary {
    pub unit_type: UnitType,
    pub min_rent: f64,
    pub max_rent: f64,
    pub mean_rent: f64,
    pub count: i64,
}
