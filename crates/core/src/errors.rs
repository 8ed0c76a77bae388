use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown unit type `{0}` (expected 1_bedroom|2_bedroom)")]
    UnknownUnitType(String),
    #[error("unknown tour status `{0}`")]
    UnknownTourStatus(String),
}
