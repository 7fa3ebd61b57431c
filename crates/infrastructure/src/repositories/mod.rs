pub mod unit_store_repository;

pub use unit_store_repository::SqliteUnitStore;
