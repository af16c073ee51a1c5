use sqlx::SqlitePool;

/// The durable remote-id ↔ local-id link. One row per synced item; this is
/// the source of truth for "does this remote item already exist locally".
#[derive(Debug, Clone)]
pub struct RemoteItemRow {
    pub remote_id: String,
    pub checksum: String,
    pub section_id: Option<String>,
    pub movie_id: String,
    pub file_id: String,
    pub path_id: String,
    pub last_sync_ts: i64,
}

pub async fn lookup(
    pool: &SqlitePool,
    remote_id: &str,
) -> Result<Option<RemoteItemRow>, sqlx::Error> {
    let row: Option<(String, String, Option<String>, String, String, String, i64)> =
        sqlx::query_as(
            "SELECT remote_id, checksum, section_id, movie_id, file_id, path_id, last_sync_ts \
             FROM remote_item WHERE remote_id = ?",
        )
        .bind(remote_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| RemoteItemRow {
        remote_id: r.0,
        checksum: r.1,
        section_id: r.2,
        movie_id: r.3,
        file_id: r.4,
        path_id: r.5,
        last_sync_ts: r.6,
    }))
}

pub async fn upsert(pool: &SqlitePool, entry: &RemoteItemRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO remote_item \
         (remote_id, checksum, section_id, movie_id, file_id, path_id, last_sync_ts) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(remote_id) DO UPDATE SET \
         checksum = excluded.checksum, section_id = excluded.section_id, \
         movie_id = excluded.movie_id, file_id = excluded.file_id, \
         path_id = excluded.path_id, last_sync_ts = excluded.last_sync_ts",
    )
    .bind(&entry.remote_id)
    .bind(&entry.checksum)
    .bind(&entry.section_id)
    .bind(&entry.movie_id)
    .bind(&entry.file_id)
    .bind(&entry.path_id)
    .bind(entry.last_sync_ts)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, remote_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM remote_item WHERE remote_id = ?")
        .bind(remote_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM remote_item")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
