//! Tally DNS Infrastructure Layer
pub mod database;
pub mod repositories;

pub use repositories::SqliteUnitStore;
