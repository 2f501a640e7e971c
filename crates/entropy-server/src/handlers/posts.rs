use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use entropy_shared::{
    api::{
        CreatePostRequest, PostDetailResponse, PostListParams, PostListResponse,
        UnreadResponse, UpdatePostRequest,
    },
    forum::{build_thread, validate_post},
    ForumPost, PostSummary,
};

use super::comments::fetch_thread_comments;
use super::{accessible_category_ids, require_category_access};
use crate::auth::AuthUser;
use crate::db::{ensure_user, reads, visible_posts_clause, DbPool};
use crate::error::AppError;
use crate::routes::AppState;

pub(crate) async fn fetch_post(db: &DbPool, post_id: i64) -> Result<Option<ForumPost>, sqlx::Error> {
    sqlx::query_as::<_, ForumPost>(
        r#"
        SELECT fp.id, fp.title, fp.content, fp.summary, fp.category_id,
               fc.name AS category_name, fp.author_id,
               u.username AS author_name, u.display_name AS author_display_name,
               fp.created_at, fp.updated_at
        FROM forum_posts fp
        JOIN users u ON u.id = fp.author_id
        LEFT JOIN forum_categories fc ON fc.id = fp.category_id
        WHERE fp.id = ?
        "#,
    )
    .bind(post_id)
    .fetch_optional(db)
    .await
}

/// Helper to load a post the user is allowed to see
async fn visible_post(state: &AppState, post_id: i64, user: &AuthUser) -> Result<ForumPost, AppError> {
    let post = fetch_post(&state.db, post_id)
        .await?
        .ok_or(AppError::NotFound)?;
    require_category_access(&state.db, post.category_id, user).await?;
    Ok(post)
}

fn normalize_summary(summary: Option<String>) -> Option<String> {
    summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// GET /api/v1/forum/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PostListParams>,
) -> Result<Json<PostListResponse>, AppError> {
    let category_ids = accessible_category_ids(&state.db, &user).await?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = state.config.items_per_page.max(1);
    let offset = (page - 1).saturating_mul(limit);

    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    // Build dynamic query
    let mut conditions = vec![visible_posts_clause(&category_ids)];
    if search.is_some() {
        conditions.push("(fp.title LIKE ? OR fp.content LIKE ? OR fp.summary LIKE ?)".to_string());
    }
    if params.category.is_some() {
        conditions.push("fp.category_id = ?".to_string());
    }
    let where_clause = conditions.join(" AND ");
    let pattern = search.map(|q| format!("%{}%", q));

    // Count total
    let count_query = format!("SELECT COUNT(*) FROM forum_posts fp WHERE {}", where_clause);
    let mut count_builder = sqlx::query_as::<_, (i64,)>(&count_query);

    for id in &category_ids {
        count_builder = count_builder.bind(*id);
    }
    if let Some(ref pattern) = pattern {
        count_builder = count_builder
            .bind(pattern.clone())
            .bind(pattern.clone())
            .bind(pattern.clone());
    }
    if let Some(category) = params.category {
        count_builder = count_builder.bind(category);
    }

    let (total,): (i64,) = count_builder.fetch_one(&state.db).await?;

    // Fetch page
    let select_query = format!(
        r#"
        SELECT fp.id, fp.title, fp.summary, fp.category_id, fc.name AS category_name,
               u.username AS author_name, u.display_name AS author_display_name,
               (SELECT COUNT(*) FROM forum_comments c
                WHERE c.post_id = fp.id AND c.is_deleted = FALSE) AS comment_count,
               CASE WHEN r.user_id IS NULL THEN 1 ELSE 0 END AS is_unread,
               fp.created_at, fp.updated_at
        FROM forum_posts fp
        JOIN users u ON u.id = fp.author_id
        LEFT JOIN forum_categories fc ON fc.id = fp.category_id
        LEFT JOIN forum_post_reads r ON r.post_id = fp.id AND r.user_id = ?
        WHERE {}
        ORDER BY fp.created_at DESC, fp.id DESC
        LIMIT ? OFFSET ?
        "#,
        where_clause
    );

    let mut select_builder = sqlx::query_as::<_, PostSummary>(&select_query).bind(user.id);

    for id in &category_ids {
        select_builder = select_builder.bind(*id);
    }
    if let Some(ref pattern) = pattern {
        select_builder = select_builder
            .bind(pattern.clone())
            .bind(pattern.clone())
            .bind(pattern.clone());
    }
    if let Some(category) = params.category {
        select_builder = select_builder.bind(category);
    }

    let posts = select_builder
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&state.db)
        .await?;

    let limit = i64::from(limit);
    Ok(Json(PostListResponse {
        posts,
        total,
        pages: (total + limit - 1) / limit,
        current_page: page,
    }))
}

/// GET /api/v1/forum/posts/:post_id
pub async fn get_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let post = visible_post(&state, post_id, &user).await?;

    ensure_user(&state.db, user.id, &user.username).await?;
    reads::mark_read(&state.db, user.id, post_id).await?;

    let comments = fetch_thread_comments(&state.db, post_id).await?;

    Ok(Json(PostDetailResponse {
        post,
        comments: build_thread(comments),
    }))
}

/// POST /api/v1/forum/posts
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<ForumPost>, AppError> {
    let (title, content) = validate_post(&req.title, &req.content)?;
    require_category_access(&state.db, req.category_id, &user).await?;

    ensure_user(&state.db, user.id, &user.username).await?;

    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO forum_posts (title, content, summary, category_id, author_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&title)
    .bind(&content)
    .bind(normalize_summary(req.summary))
    .bind(req.category_id)
    .bind(user.id)
    .bind(now)
    .bind(now)
    .execute(&state.db)
    .await?;

    let post_id = result.last_insert_rowid();
    tracing::info!(post_id, user_id = user.id, "Created forum post");

    let post = fetch_post(&state.db, post_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(post))
}

/// PATCH /api/v1/forum/posts/:post_id
pub async fn update_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<i64>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<ForumPost>, AppError> {
    let existing = visible_post(&state, post_id, &user).await?;

    // Author or management can edit
    if !user.can_modify(existing.author_id) {
        return Err(AppError::Forbidden);
    }

    let (title, content) = validate_post(&req.title, &req.content)?;
    require_category_access(&state.db, req.category_id, &user).await?;

    sqlx::query(
        r#"
        UPDATE forum_posts
        SET title = ?, content = ?, summary = ?, category_id = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&title)
    .bind(&content)
    .bind(normalize_summary(req.summary))
    .bind(req.category_id)
    .bind(Utc::now())
    .bind(post_id)
    .execute(&state.db)
    .await?;

    tracing::info!(post_id, user_id = user.id, "Edited forum post");

    let post = fetch_post(&state.db, post_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(post))
}

/// POST /api/v1/forum/posts/:post_id/read
pub async fn mark_post_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<i64>,
) -> Result<(), AppError> {
    visible_post(&state, post_id, &user).await?;

    ensure_user(&state.db, user.id, &user.username).await?;
    if reads::mark_read(&state.db, user.id, post_id).await? {
        tracing::debug!(post_id, user_id = user.id, "Marked post as read");
    }
    Ok(())
}

/// GET /api/v1/forum/unread
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UnreadResponse>, AppError> {
    let category_ids = accessible_category_ids(&state.db, &user).await?;
    let unread = reads::count_unread(&state.db, user.id, &category_ids).await?;
    Ok(Json(UnreadResponse { unread }))
}
