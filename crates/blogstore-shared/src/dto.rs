//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to create a blog, optionally with its first posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub posts: Vec<NewPostRequest>,
}

/// Request to change a blog's name and active flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    pub name: String,
    pub is_active: bool,
}

/// A post created together with its blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPostRequest {
    pub name: String,
    pub content: String,
}

/// Request to create a post in an existing blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub blog_id: Option<i32>,
    pub name: String,
    pub content: String,
}

/// Request to modify a post. `blog_id` moves it to another blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub blog_id: Option<i32>,
    pub name: String,
    pub content: String,
}

/// Query flag for blog reads.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BlogQuery {
    #[serde(default)]
    pub include_posts: bool,
}

/// Identifier assigned by a create call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<PostResponse>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub blog_id: i32,
    pub name: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}
