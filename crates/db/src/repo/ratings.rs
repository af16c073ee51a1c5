use shelfsync_core::types::MediaKind;
use sqlx::SqlitePool;

/// Insert or overwrite the rating row for (media, source). Returns the
/// rating id referenced by the main movie row.
pub async fn upsert_rating(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
    source: &str,
    rating: Option<f64>,
    votes: Option<i64>,
) -> Result<String, sqlx::Error> {
    let existing: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM rating WHERE media_id = ? AND media_type = ? AND source = ?",
    )
    .bind(media_id)
    .bind(media_type.as_str())
    .bind(source)
    .fetch_optional(pool)
    .await?;

    if let Some((id,)) = existing {
        sqlx::query("UPDATE rating SET rating = ?, votes = ? WHERE id = ?")
            .bind(rating)
            .bind(votes)
            .bind(&id)
            .execute(pool)
            .await?;
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO rating (id, media_id, media_type, source, rating, votes) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(media_id)
    .bind(media_type.as_str())
    .bind(source)
    .bind(rating)
    .bind(votes)
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn remove_ratings(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM rating WHERE media_id = ? AND media_type = ?")
        .bind(media_id)
        .bind(media_type.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_ratings(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM rating WHERE media_id = ? AND media_type = ?")
            .bind(media_id)
            .bind(media_type.as_str())
            .fetch_one(pool)
            .await?;
    Ok(count)
}
