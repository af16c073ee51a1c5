use shelfsync_core::types::{MediaKind, PersonKind};
use sqlx::SqlitePool;

/// One person association to write: the person row is shared across the
/// library (get-or-create by name), the link row is per media item.
#[derive(Debug, Clone)]
pub struct PersonWrite {
    pub name: String,
    pub kind: PersonKind,
    pub role: Option<String>,
    pub thumb_url: Option<String>,
}

/// Replace the full people set for a media item. Cast order within each
/// link kind follows the order of `people`.
pub async fn replace_people(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
    people: &[PersonWrite],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM person_link WHERE media_id = ? AND media_type = ?")
        .bind(media_id)
        .bind(media_type.as_str())
        .execute(pool)
        .await?;

    let mut order_by_kind = std::collections::HashMap::new();
    for person in people {
        let person_id = find_or_create_person(pool, &person.name, person.thumb_url.as_deref())
            .await?;
        let order = order_by_kind.entry(person.kind).or_insert(0i64);
        sqlx::query(
            "INSERT OR IGNORE INTO person_link \
             (person_id, media_id, media_type, kind, role, sort_order) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&person_id)
        .bind(media_id)
        .bind(media_type.as_str())
        .bind(person.kind.as_str())
        .bind(&person.role)
        .bind(*order)
        .execute(pool)
        .await?;
        *order += 1;
    }

    Ok(())
}

pub async fn list_people(
    pool: &SqlitePool,
    media_id: &str,
    media_type: MediaKind,
) -> Result<Vec<(String, String, Option<String>)>, sqlx::Error> {
    let rows: Vec<(String, String, Option<String>)> = sqlx::query_as(
        "SELECT p.name, l.kind, l.role FROM person_link l \
         JOIN person p ON p.id = l.person_id \
         WHERE l.media_id = ? AND l.media_type = ? \
         ORDER BY l.kind, l.sort_order",
    )
    .bind(media_id)
    .bind(media_type.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn find_or_create_person(
    pool: &SqlitePool,
    name: &str,
    thumb_url: Option<&str>,
) -> Result<String, sqlx::Error> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM person WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    if let Some((id,)) = existing {
        if thumb_url.is_some() {
            sqlx::query("UPDATE person SET thumb_url = ? WHERE id = ?")
                .bind(thumb_url)
                .bind(&id)
                .execute(pool)
                .await?;
        }
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO person (id, name, thumb_url) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(thumb_url)
        .execute(pool)
        .await?;

    Ok(id)
}
