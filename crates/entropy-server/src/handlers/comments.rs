use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use entropy_shared::{
    api::{CreateCommentRequest, UpdateCommentRequest},
    forum::{build_thread, validate_comment},
    CommentNode, ForumComment,
};

use super::posts::fetch_post;
use super::require_category_access;
use crate::auth::AuthUser;
use crate::db::{ensure_user, DbPool};
use crate::error::AppError;
use crate::routes::AppState;

const COMMENT_COLUMNS: &str = r#"
    SELECT c.id, c.post_id, c.author_id, c.content, c.parent_id, c.created_at,
           c.updated_at, c.is_deleted, u.username, u.display_name, u.avatar_url
    FROM forum_comments c
    JOIN users u ON u.id = c.author_id
"#;

/// Every comment of a post, deleted ones included, oldest first.
pub(crate) async fn fetch_thread_comments(
    db: &DbPool,
    post_id: i64,
) -> Result<Vec<ForumComment>, sqlx::Error> {
    let query = format!("{COMMENT_COLUMNS} WHERE c.post_id = ? ORDER BY c.created_at ASC, c.id ASC");
    sqlx::query_as::<_, ForumComment>(&query)
        .bind(post_id)
        .fetch_all(db)
        .await
}

async fn fetch_comment(db: &DbPool, comment_id: i64) -> Result<Option<ForumComment>, sqlx::Error> {
    let query = format!("{COMMENT_COLUMNS} WHERE c.id = ?");
    sqlx::query_as::<_, ForumComment>(&query)
        .bind(comment_id)
        .fetch_optional(db)
        .await
}

/// Helper to verify the post exists and its category is readable
async fn verify_post(state: &AppState, post_id: i64, user: &AuthUser) -> Result<(), AppError> {
    let post = fetch_post(&state.db, post_id)
        .await?
        .ok_or(AppError::NotFound)?;
    require_category_access(&state.db, post.category_id, user).await
}

/// Helper to load a live comment the user may change
async fn editable_comment(
    state: &AppState,
    comment_id: i64,
    user: &AuthUser,
) -> Result<ForumComment, AppError> {
    let comment = fetch_comment(&state.db, comment_id)
        .await?
        .filter(|c| !c.is_deleted)
        .ok_or(AppError::NotFound)?;

    verify_post(state, comment.post_id, user).await?;

    // Author or management can change a comment
    if !user.can_modify(comment.author_id) {
        return Err(AppError::Forbidden);
    }
    Ok(comment)
}

/// GET /api/v1/forum/posts/:post_id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<CommentNode>>, AppError> {
    verify_post(&state, post_id, &user).await?;

    let comments = fetch_thread_comments(&state.db, post_id).await?;
    Ok(Json(build_thread(comments)))
}

/// POST /api/v1/forum/posts/:post_id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<i64>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<ForumComment>, AppError> {
    let content = validate_comment(&req.content)?;
    verify_post(&state, post_id, &user).await?;

    // Replies must target a live comment on the same post
    if let Some(parent_id) = req.parent_id {
        let parent: Option<(i64, bool)> =
            sqlx::query_as("SELECT post_id, is_deleted FROM forum_comments WHERE id = ?")
                .bind(parent_id)
                .fetch_optional(&state.db)
                .await?;

        match parent {
            Some((parent_post, false)) if parent_post == post_id => {}
            _ => return Err(AppError::Validation("Parent comment not found".to_string())),
        }
    }

    ensure_user(&state.db, user.id, &user.username).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO forum_comments (post_id, author_id, content, parent_id, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(post_id)
    .bind(user.id)
    .bind(&content)
    .bind(req.parent_id)
    .bind(Utc::now())
    .execute(&state.db)
    .await?;

    let comment_id = result.last_insert_rowid();
    tracing::info!(comment_id, post_id, user_id = user.id, "Created comment");

    let comment = fetch_comment(&state.db, comment_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(comment))
}

/// PATCH /api/v1/forum/comments/:comment_id
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(comment_id): Path<i64>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<ForumComment>, AppError> {
    let content = validate_comment(&req.content)?;
    editable_comment(&state, comment_id, &user).await?;

    sqlx::query("UPDATE forum_comments SET content = ?, updated_at = ? WHERE id = ?")
        .bind(&content)
        .bind(Utc::now())
        .bind(comment_id)
        .execute(&state.db)
        .await?;

    let comment = fetch_comment(&state.db, comment_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(comment))
}

/// DELETE /api/v1/forum/comments/:comment_id
///
/// Soft delete: the row stays, the comment and its replies leave the thread.
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(comment_id): Path<i64>,
) -> Result<(), AppError> {
    editable_comment(&state, comment_id, &user).await?;

    sqlx::query("UPDATE forum_comments SET is_deleted = TRUE, updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(comment_id)
        .execute(&state.db)
        .await?;

    tracing::info!(comment_id, user_id = user.id, "Deleted comment");
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::handlers::test_support::TestApp;

    const AUTHOR: (i64, &str, &[&str]) = (1, "paul", &["Entropy Member"]);
    const OTHER: (i64, &str, &[&str]) = (2, "mella", &["Entropy Member"]);
    const MANAGER: (i64, &str, &[&str]) = (3, "chef", &["Head Management"]);

    async fn setup() -> (TestApp, i64) {
        let app = TestApp::new().await;
        let (_, post) = app
            .request(
                Method::POST,
                "/api/v1/forum/posts",
                Some(AUTHOR),
                Some(json!({"title": "Roster", "content": "Who plays?"})),
            )
            .await;
        let post_id = post["id"].as_i64().unwrap();
        (app, post_id)
    }

    async fn comment(
        app: &TestApp,
        post_id: i64,
        user: (i64, &str, &[&str]),
        content: &str,
        parent_id: Option<i64>,
    ) -> (StatusCode, Value) {
        app.request(
            Method::POST,
            &format!("/api/v1/forum/posts/{post_id}/comments"),
            Some(user),
            Some(json!({"content": content, "parent_id": parent_id})),
        )
        .await
    }

    #[tokio::test]
    async fn test_replies_are_nested() {
        let (app, post_id) = setup().await;
        let (_, root) = comment(&app, post_id, AUTHOR, "first", None).await;
        let root_id = root["id"].as_i64();
        comment(&app, post_id, OTHER, "reply", root_id).await;
        comment(&app, post_id, OTHER, "second", None).await;

        let (status, body) = app
            .request(Method::GET, &format!("/api/v1/forum/posts/{post_id}"), Some(OTHER), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let thread = body["comments"].as_array().unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0]["content"], "first");
        assert_eq!(thread[0]["replies"][0]["content"], "reply");
        assert_eq!(thread[0]["replies"][0]["username"], "mella");
        assert_eq!(thread[1]["content"], "second");
    }

    #[tokio::test]
    async fn test_comment_content_is_validated() {
        let (app, post_id) = setup().await;

        let (status, _) = comment(&app, post_id, AUTHOR, "   ", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = comment(&app, post_id, AUTHOR, &"x".repeat(2001), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = comment(&app, post_id, AUTHOR, &"x".repeat(2000), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"].as_str().unwrap().len(), 2000);
    }

    #[tokio::test]
    async fn test_reply_must_target_same_post() {
        let (app, post_id) = setup().await;
        let (_, other_post) = app
            .request(
                Method::POST,
                "/api/v1/forum/posts",
                Some(AUTHOR),
                Some(json!({"title": "Other", "content": "text"})),
            )
            .await;
        let other_post = other_post["id"].as_i64().unwrap();
        let (_, foreign) = comment(&app, other_post, AUTHOR, "elsewhere", None).await;

        let (status, body) = comment(&app, post_id, AUTHOR, "reply", foreign["id"].as_i64()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Parent comment not found");

        let (status, _) = comment(&app, 999, AUTHOR, "nowhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_only_author_or_management_edits() {
        let (app, post_id) = setup().await;
        let (_, created) = comment(&app, post_id, AUTHOR, "typo", None).await;
        let uri = format!("/api/v1/forum/comments/{}", created["id"]);

        let (status, _) = app
            .request(Method::PATCH, &uri, Some(OTHER), Some(json!({"content": "hijack"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .request(Method::PATCH, &uri, Some(AUTHOR), Some(json!({"content": " fixed "})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "fixed");
        assert!(body["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_deleting_hides_the_subtree() {
        let (app, post_id) = setup().await;
        let (_, parent) = comment(&app, post_id, AUTHOR, "parent", None).await;
        comment(&app, post_id, OTHER, "child", parent["id"].as_i64()).await;
        comment(&app, post_id, OTHER, "sibling", None).await;

        let uri = format!("/api/v1/forum/comments/{}", parent["id"]);
        let (status, _) = app.request(Method::DELETE, &uri, Some(OTHER), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.request(Method::DELETE, &uri, Some(MANAGER), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, thread) = app
            .request(
                Method::GET,
                &format!("/api/v1/forum/posts/{post_id}/comments"),
                Some(OTHER),
                None,
            )
            .await;
        let thread = thread.as_array().unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0]["content"], "sibling");

        // Replying to a deleted comment is refused, and it cannot be edited again.
        let (status, _) = comment(&app, post_id, OTHER, "late", parent["id"].as_i64()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = app.request(Method::DELETE, &uri, Some(MANAGER), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (listed,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forum_comments")
            .fetch_one(&app.db)
            .await
            .unwrap();
        assert_eq!(listed, 3);
    }
}
