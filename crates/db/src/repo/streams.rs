use sqlx::SqlitePool;

/// One media stream attached to a file row.
#[derive(Debug, Clone)]
pub struct StreamWrite {
    pub kind: String,
    pub codec: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub channels: Option<i64>,
    pub language: Option<String>,
    pub duration_secs: Option<i64>,
}

/// Replace the full stream set for a file. Video streams without their
/// own duration inherit the item runtime.
pub async fn replace_streams(
    pool: &SqlitePool,
    file_id: &str,
    streams: &[StreamWrite],
    runtime_secs: Option<i64>,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM stream WHERE file_id = ?")
        .bind(file_id)
        .execute(pool)
        .await?;

    for (index, stream) in streams.iter().enumerate() {
        let duration = match stream.kind.as_str() {
            "video" => stream.duration_secs.or(runtime_secs),
            _ => stream.duration_secs,
        };
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO stream (id, file_id, stream_index, kind, codec, width, height, \
             channels, language, duration_secs) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(file_id)
        .bind(index as i64)
        .bind(&stream.kind)
        .bind(&stream.codec)
        .bind(stream.width)
        .bind(stream.height)
        .bind(stream.channels)
        .bind(&stream.language)
        .bind(duration)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn count_streams(pool: &SqlitePool, file_id: &str) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stream WHERE file_id = ?")
        .bind(file_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
