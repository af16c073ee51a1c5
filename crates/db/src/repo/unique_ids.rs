use shelfsync_core::types::MediaKind;
use sqlx::SqlitePool;

/// Replace the full provider-id set for a media item. `ids` maps provider
/// name (imdb, tmdb, tvdb, …) to the external id string.
pub async fn replace_unique_ids(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
    ids: &[(String, String)],
) -> Result<(), sqlx::Error> {
    remove_unique_ids(pool, media_id, media_type).await?;

    for (provider, value) in ids {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO unique_id (id, media_id, media_type, provider, value) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(media_id)
        .bind(media_type.as_str())
        .bind(provider)
        .bind(value)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn remove_unique_ids(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM unique_id WHERE media_id = ? AND media_type = ?")
        .bind(media_id)
        .bind(media_type.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_unique_ids(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
) -> Result<Vec<(String, String)>, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT provider, value FROM unique_id \
         WHERE media_id = ? AND media_type = ? ORDER BY provider",
    )
    .bind(media_id)
    .bind(media_type.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
