use shelfsync_core::types::{LabelKind, MediaKind};
use sqlx::SqlitePool;

/// Replace the full label association set (genres, studios, countries or
/// tags) for a media item. Passing an empty slice clears the set.
///
/// Table names come from [`LabelKind::as_str`], never from caller input.
pub async fn replace_labels(
    pool: &SqlitePool,
    kind: LabelKind,
    media_id: &str,
    media_type: MediaKind,
    names: &[String],
) -> Result<(), sqlx::Error> {
    let table = kind.as_str();

    let delete = format!(
        "DELETE FROM {table}_link WHERE media_id = ? AND media_type = ?"
    );
    sqlx::query(&delete)
        .bind(media_id)
        .bind(media_type.as_str())
        .execute(pool)
        .await?;

    for name in names {
        let label_id = find_or_create_label(pool, table, name).await?;
        let insert = format!(
            "INSERT OR IGNORE INTO {table}_link ({table}_id, media_id, media_type) \
             VALUES (?, ?, ?)"
        );
        sqlx::query(&insert)
            .bind(&label_id)
            .bind(media_id)
            .bind(media_type.as_str())
            .execute(pool)
            .await?;
    }

    Ok(())
}

pub async fn list_labels(
    pool: &SqlitePool,
    kind: LabelKind,
    media_id: &str,
    media_type: MediaKind,
) -> Result<Vec<String>, sqlx::Error> {
    let table = kind.as_str();
    let query = format!(
        "SELECT n.name FROM {table}_link l \
         JOIN {table} n ON n.id = l.{table}_id \
         WHERE l.media_id = ? AND l.media_type = ? ORDER BY n.name"
    );
    let rows: Vec<(String,)> = sqlx::query_as(&query)
        .bind(media_id)
        .bind(media_type.as_str())
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

async fn find_or_create_label(
    pool: &SqlitePool,
    table: &str,
    name: &str,
) -> Result<String, sqlx::Error> {
    let select = format!("SELECT id FROM {table} WHERE name = ?");
    let existing: Option<(String,)> = sqlx::query_as(&select)
        .bind(name)
        .fetch_optional(pool)
        .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let insert = format!("INSERT INTO {table} (id, name) VALUES (?, ?)");
    sqlx::query(&insert)
        .bind(&id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(id)
}
