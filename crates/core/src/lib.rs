pub mod config;
pub mod domain;
pub mod errors;

pub use domain::amenity::{Amenity, AmenityId};
pub use domain::prospect::{NewProspect, Prospect, ProspectId, ProspectPatch};
pub use domain::tour::{TourBooking, TourId, TourStatus, TourWithUnit};
pub use domain::unit::{PricingSummary, Unit, UnitId, UnitType};
pub use errors::DomainError;
