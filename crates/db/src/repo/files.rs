use sqlx::SqlitePool;

#[derive(Debug, Clone)]
pub struct FileRow {
    pub id: String,
    pub path_id: String,
    pub filename: String,
    pub date_added: Option<String>,
    pub play_count: Option<i64>,
    pub last_played_ts: Option<i64>,
}

/// Insert a new file row.
pub async fn add_file(
    pool: &SqlitePool,
    filename: &str,
    path_id: &str,
    date_added: Option<&str>,
) -> Result<String, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "INSERT INTO file (id, path_id, filename, date_added, created_ts) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(path_id)
    .bind(filename)
    .bind(date_added)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Get or create the file row for (path_id, filename), refreshing its
/// added date. Returns the row id, which may differ from the id the
/// caller previously held if the file moved to another path.
pub async fn modify_file(
    pool: &SqlitePool,
    filename: &str,
    path_id: &str,
    date_added: Option<&str>,
) -> Result<String, sqlx::Error> {
    let existing: Option<(String,)> =
        sqlx::query_as("SELECT id FROM file WHERE path_id = ? AND filename = ?")
            .bind(path_id)
            .bind(filename)
            .fetch_optional(pool)
            .await?;

    if let Some((id,)) = existing {
        sqlx::query("UPDATE file SET date_added = ? WHERE id = ?")
            .bind(date_added)
            .bind(&id)
            .execute(pool)
            .await?;
        return Ok(id);
    }

    add_file(pool, filename, path_id, date_added).await
}

/// Delete a file row together with its bookmark and stream rows.
pub async fn remove_file(pool: &SqlitePool, file_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM bookmark WHERE file_id = ?")
        .bind(file_id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM stream WHERE file_id = ?")
        .bind(file_id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM file WHERE id = ?")
        .bind(file_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_file(pool: &SqlitePool, file_id: &str) -> Result<Option<FileRow>, sqlx::Error> {
    let row: Option<(String, String, String, Option<String>, Option<i64>, Option<i64>)> =
        sqlx::query_as(
            "SELECT id, path_id, filename, date_added, play_count, last_played_ts \
             FROM file WHERE id = ?",
        )
        .bind(file_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| FileRow {
        id: r.0,
        path_id: r.1,
        filename: r.2,
        date_added: r.3,
        play_count: r.4,
        last_played_ts: r.5,
    }))
}
