//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use blogstore_core::domain::{Blog, Post};
use blogstore_core::error::RepoError;
use blogstore_core::ports::{BlogRepository, PostRepository};

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

fn with_posts((model, posts): (blog::Model, Vec<post::Model>)) -> Blog {
    let mut blog = Blog::from(model);
    blog.posts = posts.into_iter().map(Into::into).collect();
    blog
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn find_with_posts(&self, id: i32) -> Result<Option<Blog>, RepoError> {
        tracing::debug!(blog_id = id, "Loading blog with posts");

        let result = BlogEntity::find_by_id(id)
            .find_with_related(PostEntity)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().next().map(with_posts))
    }

    async fn find_all_with_posts(&self) -> Result<Vec<Blog>, RepoError> {
        let result = BlogEntity::find()
            .order_by_asc(blog::Column::Id)
            .find_with_related(PostEntity)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(with_posts).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_blog_id(&self, blog_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::BlogId.eq(blog_id))
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
