//! Blog handlers.

use actix_web::{HttpResponse, web};

use blogstore_core::domain::{Blog, Post};
use blogstore_shared::ApiResponse;
use blogstore_shared::dto::{
    BlogQuery, BlogResponse, CreateBlogRequest, CreatedResponse, UpdateBlogRequest,
};

use super::posts::post_response;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn blog_response(blog: Blog, include_posts: bool) -> BlogResponse {
    BlogResponse {
        id: blog.id.unwrap_or_default(),
        name: blog.name,
        is_active: blog.is_active,
        posts: include_posts.then(|| blog.posts.into_iter().map(post_response).collect()),
    }
}

fn blog_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Blog with id {} not found", id))
}

/// POST /api/blogs
pub async fn create_blog(
    state: web::Data<AppState>,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut blog = Blog::new(req.name, req.is_active);
    blog.posts = req
        .posts
        .into_iter()
        .map(|p| Post::new(None, p.name, p.content))
        .collect();

    let mut uow = state.unit_of_work();
    uow.add_blog(blog);
    let receipt = uow.save_changes().await?;

    let id = receipt
        .blog_ids
        .first()
        .copied()
        .ok_or_else(|| AppError::Internal("no id assigned to new blog".to_string()))?;
    let posts = receipt.post_ids.len();
    tracing::info!(blog_id = id, posts, "Blog created");

    Ok(HttpResponse::Created().json(
        ApiResponse::ok(CreatedResponse { id })
            .with_message(format!("Blog created with {posts} posts")),
    ))
}

/// GET /api/blogs?include_posts=true
pub async fn list_blogs(
    state: web::Data<AppState>,
    query: web::Query<BlogQuery>,
) -> AppResult<HttpResponse> {
    let include_posts = query.include_posts;
    let blogs = if include_posts {
        state.blogs.find_all_with_posts().await?
    } else {
        state.blogs.find_all().await?
    };

    let body: Vec<BlogResponse> = blogs
        .into_iter()
        .map(|b| blog_response(b, include_posts))
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/blogs/{id}?include_posts=true
pub async fn get_blog(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<BlogQuery>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let blog = if query.include_posts {
        state.blogs.find_with_posts(id).await?
    } else {
        state.blogs.find_by_id(id).await?
    };

    let blog = blog.ok_or_else(|| blog_not_found(id))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(blog_response(blog, query.include_posts))))
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateBlogRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let mut blog = state
        .blogs
        .find_by_id(id)
        .await?
        .ok_or_else(|| blog_not_found(id))?;
    blog.name = req.name;
    blog.is_active = req.is_active;

    let mut uow = state.unit_of_work();
    uow.update_blog(blog.clone())?;
    uow.save_changes().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(blog_response(blog, false))))
}

/// DELETE /api/blogs/{id} - removes the blog and all of its posts.
pub async fn delete_blog(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let mut uow = state.unit_of_work();
    uow.remove_blog(id);
    let receipt = uow.save_changes().await?;

    if receipt.deleted == 0 {
        return Err(blog_not_found(id));
    }

    tracing::info!(blog_id = id, "Blog deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/blogs/{id}/posts
pub async fn list_blog_posts(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if state.blogs.find_by_id(id).await?.is_none() {
        return Err(blog_not_found(id));
    }

    let posts: Vec<_> = state
        .posts
        .find_by_blog_id(id)
        .await?
        .into_iter()
        .map(post_response)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}
