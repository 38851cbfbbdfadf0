//! Domain-level error types.

use std::fmt;

use thiserror::Error;

/// Constraint failures collected for one staged entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityViolations {
    pub entity_type: &'static str,
    pub messages: Vec<String>,
}

/// Aggregated constraint violation raised by the commit gate.
///
/// Carries every failing entity and every individual message, never just the first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub violations: Vec<EntityViolations>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Flattened `"<Entity>: <message>"` lines, in staging order.
    pub fn messages(&self) -> Vec<String> {
        self.violations
            .iter()
            .flat_map(|v| {
                v.messages
                    .iter()
                    .map(move |m| format!("{}: {}", v.entity_type, m))
            })
            .collect()
    }

    pub(crate) fn push(&mut self, violations: EntityViolations) {
        if !violations.messages.is_empty() {
            self.violations.push(violations);
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{} ({})", v.entity_type, v.messages.join(" ")))
            .collect();
        write!(f, "validation failed for {}", failed.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity_type} has no identifier; only stored entities can be modified")]
    Unpersisted { entity_type: &'static str },

    #[error("Referential integrity violation: {0}")]
    Referential(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity_type, id } => DomainError::NotFound { entity_type, id },
            RepoError::ForeignKey(msg) => DomainError::Referential(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Storage(msg),
        }
    }
}
