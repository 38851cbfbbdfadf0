//! Declarative field constraints and the generic routine that checks them.
//!
//! Entities describe their constraints as a static table of [`FieldConstraint`]
//! descriptors. [`validate`] walks that table and asks the entity for the
//! current value of each field, so the same declaration can be read by any
//! other consumer (API input checks, documentation) without drifting apart.

use chrono::{DateTime, Utc};

use crate::error::EntityViolations;

/// Constraint descriptor for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConstraint {
    /// Field key passed to [`Validatable::field_value`].
    pub field: &'static str,
    /// Name used in messages.
    pub label: &'static str,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl FieldConstraint {
    pub const fn new(field: &'static str, label: &'static str) -> Self {
        Self {
            field,
            label,
            required: false,
            min_length: None,
            max_length: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Inclusive character-count bounds.
    pub const fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Check one value against this descriptor.
    ///
    /// A missing required value reports only the required failure; length
    /// rules are not evaluated on it.
    pub fn check(&self, value: &FieldValue<'_>) -> Vec<String> {
        let mut messages = Vec::new();

        if self.required && !value.is_present() {
            messages.push(format!("The {} field is required.", self.label));
            return messages;
        }

        if let FieldValue::Text(Some(text)) = value {
            let len = text.chars().count();
            let too_short = self.min_length.is_some_and(|min| len < min);
            let too_long = self.max_length.is_some_and(|max| len > max);
            if too_short || too_long {
                messages.push(self.length_message());
            }
        }

        messages
    }

    fn length_message(&self) -> String {
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) => format!(
                "The field {} must be a string with a minimum length of {} and a maximum length of {}.",
                self.label, min, max
            ),
            (None, Some(max)) => format!(
                "The field {} must be a string with a maximum length of {}.",
                self.label, max
            ),
            (Some(min), None) => format!(
                "The field {} must be a string with a minimum length of {}.",
                self.label, min
            ),
            (None, None) => String::new(),
        }
    }
}

/// The current value of a constrained field, as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Reference(Option<i32>),
    Timestamp(Option<&'a DateTime<Utc>>),
    /// Reference resolved by the owning entity within the same commit.
    Owned,
}

impl FieldValue<'_> {
    /// Whether a required constraint is satisfied. Blank text counts as absent.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_some_and(|t| !t.trim().is_empty()),
            FieldValue::Reference(id) => id.is_some(),
            FieldValue::Timestamp(ts) => ts.is_some(),
            FieldValue::Owned => true,
        }
    }
}

/// An entity that carries a constraint table.
pub trait Validatable {
    /// Entity type named in aggregated errors.
    const ENTITY: &'static str;

    /// Declared constraints, one descriptor per constrained field.
    const CONSTRAINTS: &'static [FieldConstraint];

    /// Current value of the field named by a descriptor.
    fn field_value(&self, field: &str) -> FieldValue<'_>;
}

/// Full-object validation against every declared constraint.
///
/// Pure: reads the entity and never mutates it. All failing messages are
/// collected; an empty `messages` list means the entity is valid.
pub fn validate<T: Validatable + ?Sized>(entity: &T) -> EntityViolations {
    let messages = T::CONSTRAINTS
        .iter()
        .flat_map(|constraint| constraint.check(&entity.field_value(constraint.field)))
        .collect();

    EntityViolations {
        entity_type: T::ENTITY,
        messages,
    }
}
