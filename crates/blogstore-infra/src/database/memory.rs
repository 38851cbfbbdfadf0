//! In-memory store - used when no database is configured, and in tests.
//!
//! Rows are kept in their storage representation (`is_active` as text) so the
//! value conversion is exercised exactly as it is against PostgreSQL.
//! Note: Data is lost on process restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use blogstore_core::domain::{Blog, Post};
use blogstore_core::error::RepoError;
use blogstore_core::ports::{
    BaseRepository, BlogRepository, Change, ChangeStore, CommitReceipt, PostRepository,
};

use super::mapping::IS_ACTIVE;

/// A row of `blogs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogRow {
    pub blog_id: i32,
    pub name: String,
    pub is_active: String,
}

/// A row of `articles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRow {
    pub post_id: i32,
    pub blog_id: i32,
    pub name: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl From<&BlogRow> for Blog {
    fn from(row: &BlogRow) -> Self {
        Self {
            id: Some(row.blog_id),
            name: row.name.clone(),
            is_active: IS_ACTIVE.decode(&row.is_active),
            posts: Vec::new(),
        }
    }
}

impl From<&PostRow> for Post {
    fn from(row: &PostRow) -> Self {
        Self {
            id: Some(row.post_id),
            blog_id: Some(row.blog_id),
            name: row.name.clone(),
            content: row.content.clone(),
            created: row.created,
            updated: row.updated,
        }
    }
}

#[derive(Debug, Clone)]
struct Tables {
    blogs: BTreeMap<i32, BlogRow>,
    posts: BTreeMap<i32, PostRow>,
    next_blog_id: i32,
    next_post_id: i32,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            blogs: BTreeMap::new(),
            posts: BTreeMap::new(),
            next_blog_id: 1,
            next_post_id: 1,
        }
    }
}

impl Tables {
    fn parent_of(&self, blog_id: Option<i32>) -> Result<i32, RepoError> {
        match blog_id {
            Some(id) if self.blogs.contains_key(&id) => Ok(id),
            Some(id) => Err(RepoError::ForeignKey(format!("blog {id} does not exist"))),
            None => Err(RepoError::ForeignKey("post has no parent blog".to_string())),
        }
    }

    fn insert_post(&mut self, post: &Post, blog_id: i32) -> i32 {
        let post_id = self.next_post_id;
        self.next_post_id += 1;
        self.posts.insert(
            post_id,
            PostRow {
                post_id,
                blog_id,
                name: post.name.clone(),
                content: post.content.clone(),
                created: post.created,
                updated: post.updated,
            },
        );
        post_id
    }

    fn apply(&mut self, change: Change, receipt: &mut CommitReceipt) -> Result<(), RepoError> {
        match change {
            Change::AddBlog(blog) => {
                let blog_id = self.next_blog_id;
                self.next_blog_id += 1;
                self.blogs.insert(
                    blog_id,
                    BlogRow {
                        blog_id,
                        name: blog.name.clone(),
                        is_active: IS_ACTIVE.encode(blog.is_active).to_string(),
                    },
                );
                receipt.blog_ids.push(blog_id);

                for post in &blog.posts {
                    let post_id = self.insert_post(post, blog_id);
                    receipt.post_ids.push(post_id);
                }
            }
            Change::UpdateBlog(blog) => {
                let id = blog.id.unwrap_or_default();
                let row = self.blogs.get_mut(&id).ok_or(RepoError::NotFound {
                    entity_type: "Blog",
                    id,
                })?;
                row.name = blog.name;
                row.is_active = IS_ACTIVE.encode(blog.is_active).to_string();
                receipt.updated += 1;
            }
            Change::DeleteBlog(id) => {
                if self.blogs.remove(&id).is_some() {
                    self.posts.retain(|_, post| post.blog_id != id);
                    receipt.deleted += 1;
                }
            }
            Change::AddPost(post) => {
                let blog_id = self.parent_of(post.blog_id)?;
                let post_id = self.insert_post(&post, blog_id);
                receipt.post_ids.push(post_id);
            }
            Change::UpdatePost(post) => {
                let id = post.id.unwrap_or_default();
                let blog_id = self.parent_of(post.blog_id)?;
                let row = self.posts.get_mut(&id).ok_or(RepoError::NotFound {
                    entity_type: "Post",
                    id,
                })?;
                row.blog_id = blog_id;
                row.name = post.name;
                row.content = post.content;
                row.updated = post.updated;
                receipt.updated += 1;
            }
            Change::DeletePost(id) => {
                if self.posts.remove(&id).is_some() {
                    receipt.deleted += 1;
                }
            }
        }

        Ok(())
    }
}

/// In-memory blog store using ordered maps behind an async RwLock.
///
/// A batch is applied to a copy of the tables which replaces the live copy
/// only when every change succeeded.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw `blogs` row, as it would be persisted.
    pub async fn blog_row(&self, blog_id: i32) -> Option<BlogRow> {
        self.tables.read().await.blogs.get(&blog_id).cloned()
    }

    /// Raw `articles` rows referencing a blog.
    pub async fn post_rows(&self, blog_id: i32) -> Vec<PostRow> {
        self.tables
            .read()
            .await
            .posts
            .values()
            .filter(|post| post.blog_id == blog_id)
            .cloned()
            .collect()
    }

    fn load_posts(tables: &Tables, blog_id: i32) -> Vec<Post> {
        tables
            .posts
            .values()
            .filter(|post| post.blog_id == blog_id)
            .map(Post::from)
            .collect()
    }
}

#[async_trait]
impl ChangeStore for InMemoryStore {
    async fn apply(&self, changes: Vec<Change>) -> Result<CommitReceipt, RepoError> {
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        let mut receipt = CommitReceipt::default();

        for change in changes {
            staged.apply(change, &mut receipt)?;
        }

        *tables = staged;
        Ok(receipt)
    }
}

#[async_trait]
impl BaseRepository<Blog, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Blog>, RepoError> {
        Ok(self.tables.read().await.blogs.get(&id).map(Blog::from))
    }

    async fn find_all(&self) -> Result<Vec<Blog>, RepoError> {
        Ok(self.tables.read().await.blogs.values().map(Blog::from).collect())
    }
}

#[async_trait]
impl BlogRepository for InMemoryStore {
    async fn find_with_posts(&self, id: i32) -> Result<Option<Blog>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.blogs.get(&id).map(|row| {
            let mut blog = Blog::from(row);
            blog.posts = Self::load_posts(&tables, id);
            blog
        }))
    }

    async fn find_all_with_posts(&self) -> Result<Vec<Blog>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .blogs
            .values()
            .map(|row| {
                let mut blog = Blog::from(row);
                blog.posts = Self::load_posts(&tables, row.blog_id);
                blog
            })
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).map(Post::from))
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.tables.read().await.posts.values().map(Post::from).collect())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_blog_id(&self, blog_id: i32) -> Result<Vec<Post>, RepoError> {
        Ok(Self::load_posts(&*self.tables.read().await, blog_id))
    }
}
