use thiserror::Error;

pub mod amenities;
pub mod prospects;
pub mod tours;
pub mod units;

pub use amenities::SqlAmenityRepository;
pub use prospects::SqlProspectRepository;
pub use tours::SqlTourRepository;
pub use units::SqlUnitRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}
