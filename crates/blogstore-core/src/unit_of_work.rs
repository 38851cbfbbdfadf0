//! Unit of work - stages changes and gates every commit on validation.
//!
//! ```text
//! Idle --save_changes--> Validating --all pass--> Committing --> Idle
//!                            |
//!                            +--any fail--> Rejected (nothing written) --> Idle
//! ```
//!
//! One instance belongs to one logical unit of work (typically one request)
//! and is never shared across tasks.

use std::sync::Arc;

use crate::domain::{Blog, OwnedPost, Post};
use crate::error::{DomainError, ValidationError};
use crate::ports::{Change, ChangeStore, CommitReceipt};
use crate::validation::validate;

pub struct UnitOfWork {
    store: Arc<dyn ChangeStore>,
    pending: Vec<Change>,
}

impl UnitOfWork {
    pub fn new(store: Arc<dyn ChangeStore>) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    /// Stage a new blog, including any posts it owns.
    pub fn add_blog(&mut self, blog: Blog) -> &mut Self {
        self.pending.push(Change::AddBlog(blog));
        self
    }

    /// Stage modifications to a stored blog.
    pub fn update_blog(&mut self, blog: Blog) -> Result<&mut Self, DomainError> {
        if blog.id.is_none() {
            return Err(DomainError::Unpersisted {
                entity_type: "Blog",
            });
        }
        self.pending.push(Change::UpdateBlog(blog));
        Ok(self)
    }

    /// Stage deletion of a blog and, by cascade, its posts.
    pub fn remove_blog(&mut self, id: i32) -> &mut Self {
        self.pending.push(Change::DeleteBlog(id));
        self
    }

    pub fn add_post(&mut self, post: Post) -> &mut Self {
        self.pending.push(Change::AddPost(post));
        self
    }

    /// Stage modifications to a stored post. `updated` is left as the caller set it.
    pub fn update_post(&mut self, post: Post) -> Result<&mut Self, DomainError> {
        if post.id.is_none() {
            return Err(DomainError::Unpersisted {
                entity_type: "Post",
            });
        }
        self.pending.push(Change::UpdatePost(post));
        Ok(self)
    }

    pub fn remove_post(&mut self, id: i32) -> &mut Self {
        self.pending.push(Change::DeletePost(id));
        self
    }

    pub fn pending(&self) -> &[Change] {
        &self.pending
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop every staged change without touching storage.
    pub fn discard(&mut self) {
        self.pending.clear();
    }

    /// Validate every staged insert and update. Deletions are not checked.
    pub fn validate_pending(&self) -> Result<(), ValidationError> {
        let mut error = ValidationError::default();

        for change in &self.pending {
            match change {
                Change::AddBlog(blog) => {
                    error.push(validate(blog));
                    for post in &blog.posts {
                        error.push(validate(&OwnedPost(post)));
                    }
                }
                Change::UpdateBlog(blog) => error.push(validate(blog)),
                Change::AddPost(post) | Change::UpdatePost(post) => error.push(validate(post)),
                Change::DeleteBlog(_) | Change::DeletePost(_) => {}
            }
        }

        if error.is_empty() { Ok(()) } else { Err(error) }
    }

    /// Commit pending changes.
    ///
    /// Validation completes before the store is touched; if any staged entity
    /// fails, nothing is written and the staged changes are kept so the caller
    /// can correct them. Dropping the returned future before it finishes
    /// leaves storage unchanged, as the store applies the batch in one
    /// transaction. Rejected commits are never retried.
    pub async fn save_changes(&mut self) -> Result<CommitReceipt, DomainError> {
        if let Err(error) = self.validate_pending() {
            tracing::warn!(
                failing = error.violations.len(),
                "Commit rejected by validation: {}",
                error
            );
            return Err(error.into());
        }

        if self.pending.is_empty() {
            return Ok(CommitReceipt::default());
        }

        let count = self.pending.len();
        let receipt = self.store.apply(self.pending.clone()).await?;
        self.pending.clear();

        tracing::info!(
            changes = count,
            blogs_inserted = receipt.blog_ids.len(),
            posts_inserted = receipt.post_ids.len(),
            updated = receipt.updated,
            deleted = receipt.deleted,
            "Changes committed"
        );

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::RepoError;

    #[derive(Default)]
    struct RecordingStore {
        batches: Mutex<Vec<Vec<Change>>>,
    }

    impl RecordingStore {
        fn batches(&self) -> Vec<Vec<Change>> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChangeStore for RecordingStore {
        async fn apply(&self, changes: Vec<Change>) -> Result<CommitReceipt, RepoError> {
            let blog_ids = changes
                .iter()
                .filter(|c| matches!(c, Change::AddBlog(_)))
                .enumerate()
                .map(|(i, _)| i as i32 + 1)
                .collect();
            self.batches.lock().unwrap().push(changes);
            Ok(CommitReceipt {
                blog_ids,
                ..Default::default()
            })
        }
    }

    fn setup() -> (Arc<RecordingStore>, UnitOfWork) {
        let store = Arc::new(RecordingStore::default());
        let uow = UnitOfWork::new(store.clone());
        (store, uow)
    }

    #[tokio::test]
    async fn test_valid_batch_reaches_store() {
        let (store, mut uow) = setup();
        uow.add_blog(Blog::new("Engineering Blog", true))
            .add_post(Post::new(Some(7), "A proper post", "Body"));

        let receipt = uow.save_changes().await.unwrap();

        assert_eq!(receipt.blog_ids, vec![1]);
        assert_eq!(store.batches().len(), 1);
        assert_eq!(store.batches()[0].len(), 2);
        assert!(!uow.has_changes());
    }

    #[tokio::test]
    async fn test_one_invalid_entity_blocks_whole_batch() {
        let (store, mut uow) = setup();
        uow.add_blog(Blog::new("Engineering Blog", true))
            .add_post(Post::new(Some(7), "Short", "Body"));

        let err = uow.save_changes().await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.batches().is_empty());
        assert_eq!(uow.pending().len(), 2);
    }

    #[tokio::test]
    async fn test_error_aggregates_every_entity_and_message() {
        let (_store, mut uow) = setup();
        uow.add_blog(Blog::new("Tiny", true))
            .add_post(Post::new(None, "Short", "c".repeat(1001)));

        let Err(DomainError::Validation(error)) = uow.save_changes().await else {
            panic!("expected validation error");
        };

        assert_eq!(error.violations.len(), 2);
        assert_eq!(error.violations[0].entity_type, "Blog");
        assert_eq!(error.violations[0].messages.len(), 1);
        assert_eq!(error.violations[1].entity_type, "Post");
        assert_eq!(error.violations[1].messages.len(), 3);
        assert_eq!(error.messages().len(), 4);
        let text = error.to_string();
        assert!(text.contains("Blog"));
        assert!(text.contains("Post"));
    }

    #[tokio::test]
    async fn test_deletions_are_not_validated() {
        let (store, mut uow) = setup();
        uow.remove_blog(3).remove_post(4);

        uow.save_changes().await.unwrap();

        assert_eq!(
            store.batches()[0],
            vec![Change::DeleteBlog(3), Change::DeletePost(4)]
        );
    }

    #[tokio::test]
    async fn test_owned_posts_are_validated_with_their_blog() {
        let (store, mut uow) = setup();
        let blog = Blog::new("Engineering Blog", true)
            .with_post(Post::new(None, "A proper post", "Body"))
            .with_post(Post::new(None, "Short", "Body"));
        uow.add_blog(blog);

        let Err(DomainError::Validation(error)) = uow.save_changes().await else {
            panic!("expected validation error");
        };

        assert_eq!(error.violations.len(), 1);
        assert_eq!(error.violations[0].entity_type, "Post");
        assert!(store.batches().is_empty());
    }

    #[tokio::test]
    async fn test_empty_commit_skips_store() {
        let (store, mut uow) = setup();
        let receipt = uow.save_changes().await.unwrap();
        assert_eq!(receipt, CommitReceipt::default());
        assert!(store.batches().is_empty());
    }

    #[test]
    fn test_update_requires_identifier() {
        let (_store, mut uow) = setup();
        let err = uow
            .update_post(Post::new(Some(1), "A proper post", "Body"))
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::Unpersisted { entity_type: "Post" }));
        assert!(!uow.has_changes());
    }

    #[test]
    fn test_discard_clears_pending() {
        let (_store, mut uow) = setup();
        uow.add_blog(Blog::new("Engineering Blog", false));
        uow.discard();
        assert!(!uow.has_changes());
    }
}
