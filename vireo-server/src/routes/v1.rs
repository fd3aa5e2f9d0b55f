use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers::{feed, social, uploads, users, videos, views};
use crate::state::AppState;

/// All v1 API routes. Authentication is enforced per handler via the
/// session extractors, not by route grouping.
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        // Feed
        .route("/feed", get(feed::feed_handler))
        // Videos
        .route("/videos", post(videos::create_video_handler))
        .route("/videos/search", get(videos::search_videos_handler))
        .route(
            "/videos/{id}",
            get(videos::get_video_handler).delete(videos::delete_video_handler),
        )
        .route("/videos/{id}/meta", get(videos::video_meta_handler))
        // Social
        .route(
            "/videos/{id}/like",
            put(social::like_video_handler).delete(social::unlike_video_handler),
        )
        .route(
            "/videos/{id}/comments",
            get(social::list_comments_handler).post(social::post_comment_handler),
        )
        .route("/comments/{id}", delete(social::delete_comment_handler))
        .route(
            "/comments/{id}/reaction",
            put(social::set_comment_reaction_handler).delete(social::clear_comment_reaction_handler),
        )
        // View feedback
        .route("/videos/{id}/view/started", post(views::view_started_handler))
        .route("/videos/{id}/view/finished", post(views::view_finished_handler))
        // Uploads
        .route("/uploads/{category}", post(uploads::create_upload_ticket_handler))
        // Users
        .route("/users", post(users::register_handler))
        .route("/users/search", get(users::search_users_handler))
        .route(
            "/users/me",
            get(users::current_user_handler).put(users::update_profile_handler),
        )
        .route("/users/me/likes", get(users::liked_videos_handler))
        .route("/users/me/history", get(users::history_handler))
        .route(
            "/users/me/history/{video}",
            delete(users::delete_history_handler),
        )
}
