pub mod amenity;
pub mod prospect;
pub mod tour;
pub mod unit;
