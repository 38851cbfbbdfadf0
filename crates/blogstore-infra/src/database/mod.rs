//! Storage: mapping, SeaORM entities, and the change stores.

mod connections;
pub mod mapping;
pub mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;
#[cfg(feature = "postgres")]
pub mod postgres_store;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
pub use mapping::{ConfigError, IS_ACTIVE, verify_registered};
pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresBlogRepository, PostgresPostRepository};
#[cfg(feature = "postgres")]
pub use postgres_store::PostgresChangeStore;
