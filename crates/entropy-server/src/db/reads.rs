//! Read receipts for forum posts.

use chrono::Utc;

use super::{visible_posts_clause, DbPool};

/// Records that the user has seen the post. Returns `false` when a receipt
/// already existed.
pub async fn mark_read(db: &DbPool, user_id: i64, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO forum_post_reads (user_id, post_id, read_at) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(post_id)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Visible posts the user holds no receipt for.
pub async fn count_unread(
    db: &DbPool,
    user_id: i64,
    visible_category_ids: &[i64],
) -> Result<i64, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT COUNT(*)
        FROM forum_posts fp
        WHERE {}
          AND NOT EXISTS (
              SELECT 1 FROM forum_post_reads r
              WHERE r.post_id = fp.id AND r.user_id = ?
          )
        "#,
        visible_posts_clause(visible_category_ids)
    );

    let mut query = sqlx::query_as::<_, (i64,)>(&sql);
    for id in visible_category_ids {
        query = query.bind(*id);
    }
    let (count,) = query.bind(user_id).fetch_one(db).await?;

    Ok(count)
}
