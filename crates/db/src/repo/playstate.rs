use sqlx::SqlitePool;

/// Write the watch state for a file: play counts on the file row, resume
/// position as a bookmark. A zero (or absent) resume point clears the
/// bookmark instead of storing a zero-length one.
pub async fn set_resume(
    pool: &SqlitePool,
    file_id: &str,
    resume_secs: f64,
    total_secs: Option<i64>,
    play_count: Option<i64>,
    last_played_ts: Option<i64>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE file SET play_count = ?, last_played_ts = ? WHERE id = ?")
        .bind(play_count)
        .bind(last_played_ts)
        .bind(file_id)
        .execute(pool)
        .await?;

    if resume_secs <= 0.0 {
        sqlx::query("DELETE FROM bookmark WHERE file_id = ?")
            .bind(file_id)
            .execute(pool)
            .await?;
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO bookmark (file_id, position_secs, total_secs) VALUES (?, ?, ?) \
         ON CONFLICT(file_id) DO UPDATE SET \
         position_secs = excluded.position_secs, total_secs = excluded.total_secs",
    )
    .bind(file_id)
    .bind(resume_secs)
    .bind(total_secs.map(|t| t as f64))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_resume(
    pool: &SqlitePool,
    file_id: &str,
) -> Result<Option<(f64, Option<f64>)>, sqlx::Error> {
    let row: Option<(f64, Option<f64>)> =
        sqlx::query_as("SELECT position_secs, total_secs FROM bookmark WHERE file_id = ?")
            .bind(file_id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}
