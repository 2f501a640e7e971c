pub mod categories;
pub mod comments;
pub mod orgchart;
pub mod posts;
pub mod transcripts;

use entropy_shared::forum::accessible_categories;
use entropy_shared::ForumCategory;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;

async fn fetch_categories(db: &DbPool) -> Result<Vec<ForumCategory>, sqlx::Error> {
    sqlx::query_as::<_, ForumCategory>(
        r#"
        SELECT fc.id, fc.name, fc.description, fc.required_roles,
               (SELECT COUNT(*) FROM forum_posts WHERE category_id = fc.id) AS post_count
        FROM forum_categories fc
        ORDER BY fc.name
        "#,
    )
    .fetch_all(db)
    .await
}

/// Ids of the categories whose posts the user may read.
async fn accessible_category_ids(db: &DbPool, user: &AuthUser) -> Result<Vec<i64>, AppError> {
    let categories = fetch_categories(db).await?;
    Ok(accessible_categories(categories, &user.roles)
        .into_iter()
        .map(|c| c.id)
        .collect())
}

/// Helper to check that the user may read and write in a category
async fn require_category_access(
    db: &DbPool,
    category_id: Option<i64>,
    user: &AuthUser,
) -> Result<(), AppError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };

    let category: Option<(Option<String>,)> =
        sqlx::query_as("SELECT required_roles FROM forum_categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(db)
            .await?;

    let Some((required_roles,)) = category else {
        return Err(AppError::Validation("Category not found".to_string()));
    };

    if !user.can_access(required_roles.as_deref()) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
