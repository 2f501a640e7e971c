use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::auth_middleware;
use crate::handlers::{
    categories as category_handlers, comments as comment_handlers,
    orgchart as orgchart_handlers, posts as post_handlers,
    transcripts as transcript_handlers,
};
use crate::{Config, DbPool};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
}

pub fn create_router(db: DbPool, config: Config) -> Router {
    let state = AppState { db, config };

    // Org chart routes (read-only, file backed)
    let orgchart_routes = Router::new()
        .route("/", get(orgchart_handlers::get_orgchart))
        .route("/people", get(orgchart_handlers::list_people))
        .route("/stats", get(orgchart_handlers::get_statistics));

    // Forum routes
    let forum_routes = Router::new()
        .route(
            "/categories",
            get(category_handlers::list_categories).post(category_handlers::create_category),
        )
        .route(
            "/categories/:category_id",
            patch(category_handlers::update_category).delete(category_handlers::delete_category),
        )
        .route(
            "/posts",
            get(post_handlers::list_posts).post(post_handlers::create_post),
        )
        .route(
            "/posts/:post_id",
            get(post_handlers::get_post).patch(post_handlers::update_post),
        )
        .route("/posts/:post_id/read", post(post_handlers::mark_post_read))
        .route(
            "/posts/:post_id/comments",
            get(comment_handlers::list_comments).post(comment_handlers::create_comment),
        )
        .route(
            "/comments/:comment_id",
            patch(comment_handlers::update_comment).delete(comment_handlers::delete_comment),
        )
        .route("/unread", get(post_handlers::unread_count));

    // Protected routes with auth middleware
    let protected_routes = Router::new()
        .nest("/orgchart", orgchart_routes)
        .nest("/forum", forum_routes)
        .route("/transcripts/:ticket_id", get(transcript_handlers::get_transcript))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
