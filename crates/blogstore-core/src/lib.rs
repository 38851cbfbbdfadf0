//! # Blogstore Core
//!
//! The domain layer of the blog/post store.
//! This crate holds the entities, their declared field constraints, the
//! validation routine and the unit of work that gates every commit.
//! It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod unit_of_work;
pub mod validation;

pub use error::{DomainError, RepoError, ValidationError};
pub use unit_of_work::UnitOfWork;
