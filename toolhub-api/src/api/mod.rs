//! HTTP API handlers for toolhub-api

pub mod auth;
pub mod authors;
pub mod blog_posts;
pub mod demos;
pub mod health;
pub mod news;
pub mod tools;

pub use auth::{session_middleware, AuthUser, CurrentUser, MaybeUser, StaffUser};
pub use health::health_routes;

use axum::routing::{delete, get, post};
use axum::{middleware, Router};

use crate::AppState;

/// All `/api` routes, wrapped in the session middleware
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/tools", get(tools::list_tools).post(tools::create_tool))
        .route(
            "/api/tools/:id",
            get(tools::get_tool)
                .put(tools::update_tool)
                .delete(tools::delete_tool),
        )
        .route(
            "/api/tools/:id/demos",
            get(demos::list_tool_demos).post(demos::create_demo),
        )
        .route(
            "/api/tool-demos/:id",
            get(demos::get_demo)
                .put(demos::update_demo)
                .delete(demos::delete_demo),
        )
        .route(
            "/api/blog-posts",
            get(blog_posts::list_posts).post(blog_posts::create_post),
        )
        .route(
            "/api/blog-posts/:id",
            get(blog_posts::get_post)
                .put(blog_posts::update_post)
                .delete(blog_posts::delete_post),
        )
        .route(
            "/api/blog-posts/:id/increment_views",
            post(blog_posts::increment_views),
        )
        .route("/api/blog-posts/:id/images", post(blog_posts::add_image))
        .route("/api/blog-post-images/:id", delete(blog_posts::delete_image))
        .route("/api/news", get(news::list_news).post(news::create_news))
        .route(
            "/api/news/:id",
            get(news::get_news)
                .put(news::update_news)
                .delete(news::delete_news),
        )
        .route(
            "/api/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route("/api/authors/by_slug", get(authors::get_author_by_slug))
        .route(
            "/api/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .layer(middleware::from_fn_with_state(state, session_middleware))
}
