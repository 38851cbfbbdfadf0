use async_trait::async_trait;

use crate::domain::{Blog, Post};
use crate::error::RepoError;

/// Generic read-side repository.
///
/// Writes never go through repositories; they are staged on a
/// [`UnitOfWork`](crate::UnitOfWork) and committed through its gate.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID. Absence is `Ok(None)`, not an error.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// List all entities ordered by ID.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;
}

/// Blog repository with navigation loading.
#[async_trait]
pub trait BlogRepository: BaseRepository<Blog, i32> {
    /// Find a blog with its posts loaded.
    async fn find_with_posts(&self, id: i32) -> Result<Option<Blog>, RepoError>;

    /// List all blogs with their posts loaded.
    async fn find_all_with_posts(&self) -> Result<Vec<Blog>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn find_by_blog_id(&self, blog_id: i32) -> Result<Vec<Post>, RepoError>;
}
