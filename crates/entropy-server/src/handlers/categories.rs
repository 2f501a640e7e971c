use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use entropy_shared::{
    api::{CategoryListResponse, CreateCategoryRequest, UpdateCategoryRequest},
    forum::{accessible_categories, join_required_roles, validate_category_name, ASSIGNABLE_ROLES},
    ForumCategory,
};

use super::fetch_categories;
use crate::auth::AuthUser;
use crate::db::ensure_user;
use crate::error::AppError;
use crate::routes::AppState;

fn require_category_admin(user: &AuthUser) -> Result<(), AppError> {
    if !user.can_manage_categories() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

async fn check_name_free(
    state: &AppState,
    name: &str,
    except_id: Option<i64>,
) -> Result<(), AppError> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM forum_categories WHERE name = ? AND id IS NOT ?")
            .bind(name)
            .bind(except_id)
            .fetch_optional(&state.db)
            .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "A category with this name already exists".to_string(),
        ));
    }
    Ok(())
}

async fn fetch_category(state: &AppState, category_id: i64) -> Result<ForumCategory, AppError> {
    fetch_categories(&state.db)
        .await?
        .into_iter()
        .find(|c| c.id == category_id)
        .ok_or(AppError::NotFound)
}

/// GET /api/v1/forum/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CategoryListResponse>, AppError> {
    let categories = fetch_categories(&state.db).await?;

    Ok(Json(CategoryListResponse {
        categories: accessible_categories(categories, &user.roles),
        assignable_roles: ASSIGNABLE_ROLES.iter().map(|r| r.to_string()).collect(),
    }))
}

/// POST /api/v1/forum/categories
pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Json<ForumCategory>, AppError> {
    require_category_admin(&user)?;

    let name = validate_category_name(&req.name)?;
    check_name_free(&state, &name, None).await?;
    let required_roles = join_required_roles(&req.required_roles);

    ensure_user(&state.db, user.id, &user.username).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO forum_categories (name, description, required_roles, created_by, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&name)
    .bind(&req.description)
    .bind(&required_roles)
    .bind(user.id)
    .bind(Utc::now())
    .execute(&state.db)
    .await?;

    let id = result.last_insert_rowid();
    tracing::info!(category_id = id, roles = ?required_roles, "Created forum category {}", name);

    Ok(Json(ForumCategory {
        id,
        name,
        description: req.description,
        required_roles,
        post_count: 0,
    }))
}

/// PATCH /api/v1/forum/categories/:category_id
pub async fn update_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(category_id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<ForumCategory>, AppError> {
    require_category_admin(&user)?;
    fetch_category(&state, category_id).await?;

    let name = validate_category_name(&req.name)?;
    check_name_free(&state, &name, Some(category_id)).await?;
    let required_roles = join_required_roles(&req.required_roles);

    sqlx::query(
        r#"
        UPDATE forum_categories
        SET name = ?, description = ?, required_roles = ?
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(&req.description)
    .bind(&required_roles)
    .bind(category_id)
    .execute(&state.db)
    .await?;

    tracing::info!(category_id, roles = ?required_roles, "Updated forum category {}", name);

    Ok(Json(fetch_category(&state, category_id).await?))
}

/// DELETE /api/v1/forum/categories/:category_id
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(category_id): Path<i64>,
) -> Result<(), AppError> {
    require_category_admin(&user)?;

    let category = fetch_category(&state, category_id).await?;
    if category.post_count > 0 {
        return Err(AppError::Conflict(
            "Category still contains posts".to_string(),
        ));
    }

    sqlx::query("DELETE FROM forum_categories WHERE id = ?")
        .bind(category_id)
        .execute(&state.db)
        .await?;

    tracing::info!(category_id, "Deleted forum category {}", category.name);
    Ok(())
}
