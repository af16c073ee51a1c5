use sqlx::SqlitePool;

/// Get or create a path row carrying scraper metadata. Used for direct
/// filesystem paths so the library treats them as already-scraped content.
pub async fn add_path(
    pool: &SqlitePool,
    path: &str,
    content: &str,
    scraper: &str,
) -> Result<String, sqlx::Error> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM path WHERE path = ?")
        .bind(path)
        .fetch_optional(pool)
        .await?;

    if let Some((id,)) = existing {
        sqlx::query("UPDATE path SET content = ?, scraper = ? WHERE id = ?")
            .bind(content)
            .bind(scraper)
            .bind(&id)
            .execute(pool)
            .await?;
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp();
    sqlx::query("INSERT INTO path (id, path, content, scraper, created_ts) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(path)
        .bind(content)
        .bind(scraper)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(id)
}

/// Get or create a bare path row (no scraper metadata).
pub async fn get_path(pool: &SqlitePool, path: &str) -> Result<String, sqlx::Error> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM path WHERE path = ?")
        .bind(path)
        .fetch_optional(pool)
        .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp();
    sqlx::query("INSERT INTO path (id, path, created_ts) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(path)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(id)
}
