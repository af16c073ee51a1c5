use shelfsync_core::types::MediaKind;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

/// Replace the full artwork set for a media item. `art` maps art type
/// (poster, fanart, thumb, …) to a url.
pub async fn replace_artwork(
    pool: &SqlitePool,
    art: &BTreeMap<String, String>,
    media_id: &str,
    media_type: MediaKind,
) -> Result<(), sqlx::Error> {
    delete_artwork(pool, media_id, media_type).await?;

    for (art_type, url) in art {
        sqlx::query(
            "INSERT INTO art (media_id, media_type, art_type, url) VALUES (?, ?, ?, ?)",
        )
        .bind(media_id)
        .bind(media_type.as_str())
        .bind(art_type)
        .bind(url)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn delete_artwork(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM art WHERE media_id = ? AND media_type = ?")
        .bind(media_id)
        .bind(media_type.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_artwork(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
) -> Result<BTreeMap<String, String>, sqlx::Error> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT art_type, url FROM art WHERE media_id = ? AND media_type = ?")
            .bind(media_id)
            .bind(media_type.as_str())
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}
