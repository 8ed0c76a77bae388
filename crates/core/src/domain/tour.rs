use serde::{Deserialize, Serialize};

use crate::domain::prospect::ProspectId;
use crate::domain::unit::{UnitId, UnitType};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TourId(pub i64);

/// Bookings are written with this status and nothing in scope moves them out
/// of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourStatus {
    Scheduled,
}

impl TourStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
        }
    }
}

impl std::str::FromStr for TourStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Scheduled" => Ok(Self::Scheduled),
            other => Err(DomainError::UnknownTourStatus(other.to_string())),
        }
    }
}

/// Dates and times are kept as the literal strings handed to the store; the
/// tool layer normalizes what it recognizes and passes the rest through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TourBooking {
    pub id: TourId,
    pub prospect_id: ProspectId,
    pub tour_date: String,
    pub tour_time: String,
    pub unit_id: Option<UnitId>,
    pub is_virtual: bool,
    pub status: TourStatus,
    pub notes: Option<String>,
}

/// Booking row left-joined with summary fields of the attached unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TourWithUnit {
    pub id: TourId,
    pub prospect_id: ProspectId,
    pub tour_date: String,
    pub tour_time: String,
    pub unit_id: Option<UnitId>,
    pub is_virtual: bool,
    pub status: TourStatus,
    pub notes: Option<String>,
    pub unit_number: Option<String>,
    pub unit_type: Option<UnitType>,
    pub floor_plan: Option<String>,
}
