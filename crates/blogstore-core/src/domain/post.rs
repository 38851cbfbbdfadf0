use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CONTENT_MAX_LENGTH, NAME_MAX_LENGTH, NAME_MIN_LENGTH};
use crate::validation::{FieldConstraint, FieldValue, Validatable};

/// Post entity - a single article belonging to exactly one blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Assigned by storage on first commit.
    pub id: Option<i32>,
    /// Parent blog. Required; a post without one is rejected before any write.
    pub blog_id: Option<i32>,
    pub name: String,
    pub content: String,
    pub created: DateTime<Utc>,
    /// Set by the caller when the post is modified; never filled in automatically.
    pub updated: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new post stamped with the current time.
    pub fn new(blog_id: Option<i32>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            blog_id,
            name: name.into(),
            content: content.into(),
            created: Utc::now(),
            updated: None,
        }
    }
}

impl Validatable for Post {
    const ENTITY: &'static str = "Post";
    const CONSTRAINTS: &'static [FieldConstraint] = &[
        FieldConstraint::new("blog_id", "BlogId").required(),
        FieldConstraint::new("name", "Name")
            .required()
            .length(NAME_MIN_LENGTH, NAME_MAX_LENGTH),
        FieldConstraint::new("content", "Content")
            .required()
            .max_length(CONTENT_MAX_LENGTH),
        FieldConstraint::new("created", "Created").required(),
    ];

    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "blog_id" => FieldValue::Reference(self.blog_id),
            "name" => FieldValue::Text(Some(self.name.as_str())),
            "content" => FieldValue::Text(Some(self.content.as_str())),
            "created" => FieldValue::Timestamp(Some(&self.created)),
            _ => FieldValue::Text(None),
        }
    }
}

/// View of a post that is inserted together with its owning blog.
///
/// The parent reference is fixed up from the blog's new id inside the same
/// commit, so the required-parent rule is satisfied by ownership.
pub(crate) struct OwnedPost<'a>(pub &'a Post);

impl Validatable for OwnedPost<'_> {
    const ENTITY: &'static str = Post::ENTITY;
    const CONSTRAINTS: &'static [FieldConstraint] = Post::CONSTRAINTS;

    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "blog_id" => FieldValue::Owned,
            other => self.0.field_value(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    fn post(name: &str, content: &str) -> Post {
        Post::new(Some(1), name, content)
    }

    #[test]
    fn test_valid_post_passes() {
        assert!(validate(&post("A proper post", "Body text")).messages.is_empty());
    }

    #[test]
    fn test_short_name_is_rejected() {
        let result = validate(&post("Short", "Body text"));
        assert_eq!(result.entity_type, "Post");
        assert_eq!(
            result.messages,
            vec![
                "The field Name must be a string with a minimum length of 10 and a maximum length of 50."
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_name_bounds_are_inclusive() {
        for len in [10, 11, 30, 49, 50] {
            let p = post(&"n".repeat(len), "Body text");
            assert!(validate(&p).messages.is_empty(), "length {len} should pass");
        }
    }

    #[test]
    fn test_name_outside_bounds_fails() {
        for len in [1, 9, 51, 200] {
            let p = post(&"n".repeat(len), "Body text");
            assert_eq!(
                validate(&p).messages,
                vec![
                    "The field Name must be a string with a minimum length of 10 and a maximum length of 50."
                        .to_string()
                ],
                "length {len} should fail"
            );
        }
    }

    #[test]
    fn test_empty_content_reports_required() {
        for content in ["", "   "] {
            assert_eq!(
                validate(&post("A proper post", content)).messages,
                vec!["The Content field is required.".to_string()]
            );
        }
    }

    #[test]
    fn test_content_up_to_limit_passes() {
        for len in [1, 500, 999, 1000] {
            let p = post("A proper post", &"c".repeat(len));
            assert!(validate(&p).messages.is_empty(), "length {len} should pass");
        }
    }

    #[test]
    fn test_content_over_limit_fails() {
        for len in [1001, 5000] {
            let p = post("A proper post", &"c".repeat(len));
            assert_eq!(validate(&p).messages.len(), 1, "length {len} should fail");
        }
    }

    #[test]
    fn test_missing_parent_is_rejected() {
        let p = Post::new(None, "A proper post", "Body text");
        assert_eq!(
            validate(&p).messages,
            vec!["The BlogId field is required.".to_string()]
        );
    }

    #[test]
    fn test_all_failures_are_aggregated() {
        let p = Post::new(None, "Short", "c".repeat(1001));
        assert_eq!(validate(&p).messages.len(), 3);
    }

    #[test]
    fn test_owned_post_satisfies_parent_rule() {
        let p = Post::new(None, "A proper post", "Body text");
        assert!(validate(&OwnedPost(&p)).messages.is_empty());

        let bad = Post::new(None, "Short", "Body text");
        assert_eq!(validate(&OwnedPost(&bad)).messages.len(), 1);
    }
}
