use serde::{Deserialize, Serialize};

use super::{NAME_MAX_LENGTH, NAME_MIN_LENGTH, Post};
use crate::validation::{FieldConstraint, FieldValue, Validatable};

/// Blog entity - a named publication that owns its posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    /// Assigned by storage on first commit.
    pub id: Option<i32>,
    pub name: String,
    pub is_active: bool,
    /// Owned posts. Filled by `*_with_posts` reads; on insert they are
    /// stored together with the blog.
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Blog {
    /// Create a new, not yet stored blog.
    pub fn new(name: impl Into<String>, is_active: bool) -> Self {
        Self {
            id: None,
            name: name.into(),
            is_active,
            posts: Vec::new(),
        }
    }

    pub fn with_post(mut self, post: Post) -> Self {
        self.posts.push(post);
        self
    }
}

impl Validatable for Blog {
    const ENTITY: &'static str = "Blog";
    const CONSTRAINTS: &'static [FieldConstraint] = &[FieldConstraint::new("name", "Name")
        .required()
        .length(NAME_MIN_LENGTH, NAME_MAX_LENGTH)];

    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "name" => FieldValue::Text(Some(self.name.as_str())),
            _ => FieldValue::Text(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    fn name_of(len: usize) -> String {
        "b".repeat(len)
    }

    #[test]
    fn test_name_bounds_are_inclusive() {
        for len in [10, 11, 30, 49, 50] {
            let blog = Blog::new(name_of(len), true);
            assert!(validate(&blog).messages.is_empty(), "length {len} should pass");
        }
    }

    #[test]
    fn test_name_outside_bounds_fails() {
        for len in [0, 1, 9, 51, 200] {
            let blog = Blog::new(name_of(len), false);
            let result = validate(&blog);
            assert_eq!(result.entity_type, "Blog");
            assert_eq!(result.messages.len(), 1, "length {len} should fail once");
        }
    }

    #[test]
    fn test_empty_name_reports_required() {
        let result = validate(&Blog::new("", true));
        assert_eq!(result.messages, vec!["The Name field is required.".to_string()]);
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let blog = Blog::new("Short", true);
        let before = blog.clone();
        let _ = validate(&blog);
        assert_eq!(blog, before);
    }
}
