use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmenityId(pub i64);

/// Static property amenity row. `is_included` means the fee is covered by
/// rent rather than billed separately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: AmenityId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub fee_amount: f64,
    pub is_included: bool,
}
