//! Post handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogstore_core::domain::Post;
use blogstore_shared::ApiResponse;
use blogstore_shared::dto::{CreatePostRequest, CreatedResponse, PostResponse, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.unwrap_or_default(),
        blog_id: post.blog_id.unwrap_or_default(),
        name: post.name,
        content: post.content,
        created: post.created,
        updated: post.updated,
    }
}

fn post_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Post with id {} not found", id))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut uow = state.unit_of_work();
    uow.add_post(Post::new(req.blog_id, req.name, req.content));
    let receipt = uow.save_changes().await?;

    let id = receipt
        .post_ids
        .first()
        .copied()
        .ok_or_else(|| AppError::Internal("no id assigned to new post".to_string()))?;
    tracing::info!(post_id = id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(CreatedResponse { id })))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// PUT /api/posts/{id} - stamps `updated` with the current time.
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    if req.blog_id.is_some() {
        post.blog_id = req.blog_id;
    }
    post.name = req.name;
    post.content = req.content;
    post.updated = Some(Utc::now());

    let mut uow = state.unit_of_work();
    uow.update_post(post.clone())?;
    uow.save_changes().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let mut uow = state.unit_of_work();
    uow.remove_post(id);
    if uow.save_changes().await?.deleted == 0 {
        return Err(post_not_found(id));
    }

    Ok(HttpResponse::NoContent().finish())
}
