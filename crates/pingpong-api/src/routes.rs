use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::{comments, health, messages, metadata, pingpongs, posts, users};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/ping", get(health::ping))
        .route("/api/echo", post(health::echo))
        .route("/api/stats", get(health::stats))
        // Users
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/users/{id}/comments", get(comments::list_user_comments))
        // Blog
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/api/posts/{id}",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/api/posts/{id}/publish", post(posts::publish_post))
        .route("/api/posts/{id}/unpublish", post(posts::unpublish_post))
        .route(
            "/api/posts/{id}/comments",
            get(comments::list_post_comments).post(comments::create_post_comment),
        )
        .route(
            "/api/comments/{id}",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        // Work items
        .route(
            "/api/pingpongs",
            get(pingpongs::list_pingpongs).post(pingpongs::create_pingpong),
        )
        .route(
            "/api/pingpongs/{id}",
            get(pingpongs::get_pingpong)
                .patch(pingpongs::update_pingpong)
                .delete(pingpongs::delete_pingpong),
        )
        .route(
            "/api/pingpongs/{id}/messages",
            get(messages::list_pingpong_messages).post(messages::create_pingpong_message),
        )
        .route(
            "/api/pingpongs/{id}/metadata",
            get(metadata::list_pingpong_metadata).post(metadata::create_pingpong_metadata),
        )
        .route(
            "/api/messages/{id}",
            get(messages::get_message).delete(messages::delete_message),
        )
        .route(
            "/api/metadata/{id}",
            get(metadata::get_metadata)
                .patch(metadata::update_metadata)
                .delete(metadata::delete_metadata),
        )
        .with_state(state)
}
