use sqlx::SqlitePool;

/// Full scalar write for the main movie row. Association rows (people,
/// labels, artwork, streams) are written by their own repo modules; this
/// row only carries the ids they produced plus the denormalized text
/// columns the library keeps alongside the link tables.
#[derive(Debug, Clone, Default)]
pub struct MovieWrite {
    pub file_id: String,
    pub path_id: String,
    pub rating_id: Option<String>,
    pub unique_id: Option<String>,
    pub title: String,
    pub sort_title: Option<String>,
    pub plot: Option<String>,
    pub plot_outline: Option<String>,
    pub tagline: Option<String>,
    pub votes: Option<i64>,
    pub year: Option<i64>,
    pub runtime_secs: Option<i64>,
    pub content_rating: Option<String>,
    pub premiered: Option<String>,
    pub trailer: Option<String>,
    pub user_rating: Option<f64>,
    pub full_path: Option<String>,
    pub writers: Option<String>,
    pub directors: Option<String>,
    pub genres: Option<String>,
    pub studios: Option<String>,
    pub countries: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MovieRow {
    pub id: String,
    pub file_id: String,
    pub path_id: String,
    pub rating_id: Option<String>,
    pub unique_id: Option<String>,
    pub set_id: Option<String>,
    pub title: String,
    pub user_rating: Option<f64>,
}

/// Allocate a fresh movie id. The row itself is written later by
/// [`upsert_movie`], after the dependent ids exist.
pub fn new_movie_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Insert or fully overwrite the main movie row. `set_id` is deliberately
/// left alone; set membership is owned by the sets repo.
pub async fn upsert_movie(
    pool: &SqlitePool,
    movie_id: &str,
    movie: &MovieWrite,
) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "INSERT INTO movie (id, file_id, path_id, rating_id, unique_id, title, sort_title, \
         plot, plot_outline, tagline, votes, year, runtime_secs, content_rating, premiered, \
         trailer, user_rating, full_path, writers, directors, genres, studios, countries, \
         created_ts, updated_ts) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
         file_id = excluded.file_id, path_id = excluded.path_id, \
         rating_id = excluded.rating_id, unique_id = excluded.unique_id, \
         title = excluded.title, sort_title = excluded.sort_title, \
         plot = excluded.plot, plot_outline = excluded.plot_outline, \
         tagline = excluded.tagline, votes = excluded.votes, year = excluded.year, \
         runtime_secs = excluded.runtime_secs, content_rating = excluded.content_rating, \
         premiered = excluded.premiered, trailer = excluded.trailer, \
         user_rating = excluded.user_rating, full_path = excluded.full_path, \
         writers = excluded.writers, directors = excluded.directors, \
         genres = excluded.genres, studios = excluded.studios, \
         countries = excluded.countries, updated_ts = excluded.updated_ts",
    )
    .bind(movie_id)
    .bind(&movie.file_id)
    .bind(&movie.path_id)
    .bind(&movie.rating_id)
    .bind(&movie.unique_id)
    .bind(&movie.title)
    .bind(&movie.sort_title)
    .bind(&movie.plot)
    .bind(&movie.plot_outline)
    .bind(&movie.tagline)
    .bind(movie.votes)
    .bind(movie.year)
    .bind(movie.runtime_secs)
    .bind(&movie.content_rating)
    .bind(&movie.premiered)
    .bind(&movie.trailer)
    .bind(movie.user_rating)
    .bind(&movie.full_path)
    .bind(&movie.writers)
    .bind(&movie.directors)
    .bind(&movie.genres)
    .bind(&movie.studios)
    .bind(&movie.countries)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_movie(pool: &SqlitePool, movie_id: &str) -> Result<Option<MovieRow>, sqlx::Error> {
    let row: Option<(
        String,
        String,
        String,
        Option<String>,
        Option<String>,
        Option<String>,
        String,
        Option<f64>,
    )> = sqlx::query_as(
        "SELECT id, file_id, path_id, rating_id, unique_id, set_id, title, user_rating \
         FROM movie WHERE id = ?",
    )
    .bind(movie_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| MovieRow {
        id: r.0,
        file_id: r.1,
        path_id: r.2,
        rating_id: r.3,
        unique_id: r.4,
        set_id: r.5,
        title: r.6,
        user_rating: r.7,
    }))
}

pub async fn remove_movie(pool: &SqlitePool, movie_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM movie WHERE id = ?")
        .bind(movie_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_user_rating(
    pool: &SqlitePool,
    movie_id: &str,
    rating: Option<f64>,
) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().timestamp();
    sqlx::query("UPDATE movie SET user_rating = ?, updated_ts = ? WHERE id = ?")
        .bind(rating)
        .bind(now)
        .bind(movie_id)
        .execute(pool)
        .await?;
    Ok(())
}
