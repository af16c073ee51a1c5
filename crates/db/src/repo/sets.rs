use shelfsync_core::types::MediaKind;
use sqlx::SqlitePool;
use tracing::debug;

/// Get or create a movie set by name.
pub async fn create_set(pool: &SqlitePool, name: &str) -> Result<String, sqlx::Error> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM movie_set WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp();
    sqlx::query("INSERT INTO movie_set (id, name, created_ts) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(id)
}

/// Attach a movie to a set. The schema stores a single `set_id` per movie,
/// so this overwrites any previous membership.
pub async fn assign_set(
    pool: &SqlitePool,
    set_id: &str,
    movie_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE movie SET set_id = ? WHERE id = ?")
        .bind(set_id)
        .bind(movie_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Detach a movie from whatever set it was in.
pub async fn clear_set(pool: &SqlitePool, movie_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE movie SET set_id = NULL WHERE id = ?")
        .bind(movie_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_set_id(
    pool: &SqlitePool,
    movie_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT set_id FROM movie WHERE id = ?")
            .bind(movie_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(set_id,)| set_id))
}

/// Delete a set if it no longer has any member movies, together with its
/// artwork. A set that still has members is left alone.
pub async fn delete_possibly_empty_set(
    pool: &SqlitePool,
    set_id: &str,
) -> Result<(), sqlx::Error> {
    let (members,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movie WHERE set_id = ?")
        .bind(set_id)
        .fetch_one(pool)
        .await?;

    if members > 0 {
        return Ok(());
    }

    debug!(set_id, "deleting empty movie set");
    super::artwork::delete_artwork(pool, set_id, MediaKind::Set).await?;
    sqlx::query("DELETE FROM movie_set WHERE id = ?")
        .bind(set_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_set(pool: &SqlitePool, set_id: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT name FROM movie_set WHERE id = ?")
        .bind(set_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(name,)| name))
}
