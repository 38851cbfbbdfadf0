//! HTTP handlers and route configuration.

mod blogs;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/blogs")
                    .route("", web::post().to(blogs::create_blog))
                    .route("", web::get().to(blogs::list_blogs))
                    .route("/{id}", web::get().to(blogs::get_blog))
                    .route("/{id}", web::put().to(blogs::update_blog))
                    .route("/{id}", web::delete().to(blogs::delete_blog))
                    .route("/{id}/posts", web::get().to(blogs::list_blog_posts)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use super::configure_routes;
    use crate::state::AppState;

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_and_get_blog() {
        let state = AppState::in_memory();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .set_json(json!({ "name": "A Valid Blog Name", "is_active": false }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["id"].as_i64().unwrap();
        assert!(id > 0);
        assert_eq!(body["message"], "Blog created with 0 posts");

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs/{id}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "A Valid Blog Name");
        assert_eq!(body["data"]["is_active"], false);
    }

    #[actix_web::test]
    async fn test_invalid_post_returns_every_message() {
        let state = AppState::in_memory();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "blog_id": null, "name": "Short", "content": "Body" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_post_for_unknown_blog_conflicts() {
        let state = AppState::in_memory();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "blog_id": 41, "name": "Orphaned post", "content": "Body" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_missing_blog_is_not_found() {
        let state = AppState::in_memory();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/blogs/999").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri("/api/blogs/999").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delete_blog_removes_its_posts() {
        let state = AppState::in_memory();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .set_json(json!({
                "name": "Engineering Blog",
                "is_active": true,
                "posts": [
                    { "name": "First article", "content": "Body" },
                    { "name": "Second article", "content": "Body" }
                ]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["message"], "Blog created with 2 posts");

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs/{id}?include_posts=true"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let post_id = body["data"]["posts"][0]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["posts"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/blogs/{id}"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_update_post_sets_updated() {
        let state = AppState::in_memory();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .set_json(json!({ "name": "Engineering Blog", "is_active": true }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let blog_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "blog_id": blog_id, "name": "Original title", "content": "Body" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let post_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{post_id}"))
            .set_json(json!({ "blog_id": null, "name": "Revised title", "content": "New body" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["name"], "Revised title");
        assert_eq!(body["data"]["blog_id"], blog_id);
        assert!(body["data"]["updated"].is_string());
    }
}
