use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod reads;

pub type DbPool = SqlitePool;

pub async fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

/// Creates or refreshes the local row for a user known from their token.
pub async fn ensure_user(db: &DbPool, user_id: i64, username: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET username = excluded.username
        "#,
    )
    .bind(user_id)
    .bind(username)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(())
}

/// `WHERE` fragment limiting `fp` (forum_posts) to uncategorised posts and the
/// given categories. Bind the ids in order after using it.
pub fn visible_posts_clause(category_ids: &[i64]) -> String {
    if category_ids.is_empty() {
        return "fp.category_id IS NULL".to_string();
    }
    let placeholders = vec!["?"; category_ids.len()].join(", ");
    format!("(fp.category_id IS NULL OR fp.category_id IN ({placeholders}))")
}

#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    // A single connection that never recycles keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_posts_clause() {
        assert_eq!(visible_posts_clause(&[]), "fp.category_id IS NULL");
        assert_eq!(
            visible_posts_clause(&[3, 5]),
            "(fp.category_id IS NULL OR fp.category_id IN (?, ?))"
        );
    }

    #[tokio::test]
    async fn test_ensure_user_upserts() {
        let db = test_pool().await;
        ensure_user(&db, 7, "old").await.unwrap();
        ensure_user(&db, 7, "new").await.unwrap();

        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, username FROM users")
            .fetch_all(&db)
            .await
            .unwrap();
        assert_eq!(rows, vec![(7, "new".to_string())]);
    }
}
