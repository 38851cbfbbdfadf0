use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Blog, Post};
use crate::error::RepoError;

/// One staged change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Insert a blog and, after it, every post it owns.
    AddBlog(Blog),
    /// Overwrite name and active flag of a stored blog. Owned posts are untouched.
    UpdateBlog(Blog),
    /// Delete a blog; its posts go with it.
    DeleteBlog(i32),
    AddPost(Post),
    UpdatePost(Post),
    DeletePost(i32),
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
    /// Ids assigned to inserted blogs, in staging order.
    pub blog_ids: Vec<i32>,
    /// Ids assigned to inserted posts (owned posts included), in insertion order.
    pub post_ids: Vec<i32>,
    pub updated: u64,
    /// Rows removed by explicit deletes. Cascaded posts are not counted.
    pub deleted: u64,
}

/// Storage that applies a batch of already validated changes.
///
/// Implementations must be all-or-nothing: either every change is durable
/// when `apply` returns `Ok`, or none is. Changes are applied in order.
///
/// - adding a post whose parent blog does not exist fails with
///   [`RepoError::ForeignKey`];
/// - updating a missing row fails with [`RepoError::NotFound`];
/// - deleting a missing row is not an error and is simply not counted.
#[async_trait]
pub trait ChangeStore: Send + Sync {
    async fn apply(&self, changes: Vec<Change>) -> Result<CommitReceipt, RepoError>;
}
