pub mod connection;
pub mod fixtures;
pub mod repositories;
pub mod schema;

pub use connection::{connect, connect_ephemeral, connect_with_settings, DbPool};
pub use fixtures::{SeedDataset, SeedVerification};
