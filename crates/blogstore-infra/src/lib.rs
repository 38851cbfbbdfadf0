//! # Blogstore Infrastructure
//!
//! Concrete implementations of the ports defined in `blogstore-core`:
//! the storage mapping, SeaORM entities, and the change stores.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM

pub mod database;

pub use database::{ConfigError, DatabaseConfig, InMemoryStore, verify_registered};

#[cfg(feature = "postgres")]
pub use database::{PostgresBlogRepository, PostgresChangeStore, PostgresPostRepository};
