//! SeaORM entities for the `blogs` and `articles` tables.

pub mod blog;
pub mod post;
