use std::collections::HashMap;

use serde_json::json;
use sqlx::SqlitePool;

use shelfsync_catalog::client::CatalogClient;
use shelfsync_catalog::record::CatalogRecord;
use shelfsync_catalog::CatalogError;
use shelfsync_core::types::{LabelKind, MediaKind};
use shelfsync_db::repo::{
    artwork, files, labels, movies, people, playstate, ratings, remote_items, sets, streams,
    unique_ids,
};
use shelfsync_engine::config::{SectionFilter, SyncOptions};
use shelfsync_engine::movies::MovieSync;

/// Catalog stub: serves records from a map, or fails every call.
#[derive(Default)]
struct StubCatalog {
    records: HashMap<String, CatalogRecord>,
    collections: Vec<(String, String)>,
    fail: bool,
}

#[async_trait::async_trait]
impl CatalogClient for StubCatalog {
    async fn fetch_record(&self, remote_id: &str) -> Result<CatalogRecord, CatalogError> {
        if self.fail {
            return Err(CatalogError::Network("stub offline".into()));
        }
        self.records
            .get(remote_id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn section_collections(
        &self,
        _section_id: &str,
    ) -> Result<Vec<(String, String)>, CatalogError> {
        if self.fail {
            return Err(CatalogError::Network("stub offline".into()));
        }
        Ok(self.collections.clone())
    }
}

async fn test_pool() -> SqlitePool {
    let pool = shelfsync_db::connect(":memory:").await.unwrap();
    shelfsync_db::migrate::run(&pool).await.unwrap();
    pool
}

fn record(value: serde_json::Value) -> CatalogRecord {
    serde_json::from_value(value).unwrap()
}

fn matrix() -> CatalogRecord {
    record(json!({
        "remoteId": "1001",
        "sectionId": "1",
        "title": "The Matrix",
        "sortTitle": "Matrix, The",
        "plot": "A computer hacker learns the truth.",
        "plotOutline": "Hacker learns the truth.",
        "tagline": "Free your mind.",
        "year": 1999,
        "premiereDate": "1999-03-31",
        "contentRating": "R",
        "rating": 8.7,
        "voteCount": 1500,
        "userRating": 9.0,
        "runtimeSecs": 8160,
        "addedAt": 1600000000,
        "updatedAt": 1600000100,
        "viewCount": 1,
        "viewOffsetSecs": 300.0,
        "lastViewedAt": 1700000000,
        "file": "/movies/The Matrix (1999)/The Matrix.mkv",
        "genres": ["Action", "Science Fiction"],
        "studios": ["Warner Bros."],
        "countries": ["USA"],
        "guids": ["imdb://tt0133093", "tmdb://603"],
        "people": [
            {"name": "Keanu Reeves", "kind": "actor", "role": "Neo"},
            {"name": "Carrie-Anne Moss", "kind": "actor", "role": "Trinity"},
            {"name": "Lana Wachowski", "kind": "director"},
            {"name": "Lilly Wachowski", "kind": "writer"}
        ],
        "artwork": {
            "poster": "http://catalog/matrix/poster.jpg",
            "fanart": "http://catalog/matrix/fanart.jpg"
        },
        "streams": [
            {"kind": "video", "codec": "h264", "width": 1920, "height": 1080},
            {"kind": "audio", "codec": "aac", "channels": 6, "language": "eng"}
        ]
    }))
}

fn engine<'a>(pool: &'a SqlitePool, catalog: &'a StubCatalog, options: SyncOptions) -> MovieSync<'a, StubCatalog> {
    MovieSync::new(pool, catalog, options, SectionFilter::all(), 1_700_000_000)
}

async fn table_count(pool: &SqlitePool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

#[tokio::test]
async fn add_update_builds_full_fanout() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions { direct_paths: false, artwork: true });

    sync.add_update(&matrix(), "Movies", Some("1"), None).await.unwrap();

    let entry = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();
    assert_eq!(entry.checksum, "1001_1600000100");
    assert_eq!(entry.section_id.as_deref(), Some("1"));

    let movie = movies::get_movie(&pool, &entry.movie_id).await.unwrap().unwrap();
    assert_eq!(movie.title, "The Matrix");
    assert_eq!(movie.file_id, entry.file_id);
    assert_eq!(movie.unique_id.as_deref(), Some("tt0133093"));
    assert!(movie.rating_id.is_some());

    let genres = labels::list_labels(&pool, LabelKind::Genre, &entry.movie_id, MediaKind::Movie)
        .await
        .unwrap();
    assert_eq!(genres, vec!["Action", "Science Fiction"]);

    let tags = labels::list_labels(&pool, LabelKind::Tag, &entry.movie_id, MediaKind::Movie)
        .await
        .unwrap();
    assert_eq!(tags, vec!["Movies"]);

    let cast = people::list_people(&pool, &entry.movie_id, MediaKind::Movie).await.unwrap();
    assert_eq!(cast.len(), 4);

    let art = artwork::list_artwork(&pool, &entry.movie_id, MediaKind::Movie).await.unwrap();
    assert_eq!(art.len(), 2);

    assert_eq!(streams::count_streams(&pool, &entry.file_id).await.unwrap(), 2);

    let resume = playstate::get_resume(&pool, &entry.file_id).await.unwrap().unwrap();
    assert_eq!(resume.0, 300.0);

    let file = files::get_file(&pool, &entry.file_id).await.unwrap().unwrap();
    assert_eq!(file.play_count, Some(1));
    assert_eq!(file.last_played_ts, Some(1_700_000_000));
}

#[tokio::test]
async fn add_update_twice_is_idempotent() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions { direct_paths: false, artwork: true });

    sync.add_update(&matrix(), "Movies", Some("1"), None).await.unwrap();
    sync.add_update(&matrix(), "Movies", Some("1"), None).await.unwrap();

    assert_eq!(remote_items::count(&pool).await.unwrap(), 1);
    assert_eq!(table_count(&pool, "movie").await, 1);
    assert_eq!(table_count(&pool, "file").await, 1);
    assert_eq!(table_count(&pool, "path").await, 1);
    assert_eq!(table_count(&pool, "genre_link").await, 2);
    assert_eq!(table_count(&pool, "studio_link").await, 1);
    assert_eq!(table_count(&pool, "country_link").await, 1);
    assert_eq!(table_count(&pool, "tag_link").await, 1);
    assert_eq!(table_count(&pool, "person_link").await, 4);
    assert_eq!(table_count(&pool, "person").await, 4);
    assert_eq!(table_count(&pool, "unique_id").await, 2);
    assert_eq!(table_count(&pool, "rating").await, 1);
    assert_eq!(table_count(&pool, "stream").await, 2);
    assert_eq!(table_count(&pool, "art").await, 2);
}

#[tokio::test]
async fn update_reuses_movie_and_path_ids() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions::default());

    sync.add_update(&matrix(), "Movies", Some("1"), None).await.unwrap();
    let before = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();

    let mut updated = matrix();
    updated.plot = Some("New plot after a metadata refresh.".into());
    updated.updated_at = Some(1_600_000_200);
    sync.add_update(&updated, "Movies", Some("1"), None).await.unwrap();

    let after = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();
    assert_eq!(after.movie_id, before.movie_id);
    assert_eq!(after.path_id, before.path_id);
    assert_eq!(after.file_id, before.file_id);
    assert_eq!(after.checksum, "1001_1600000200");
}

#[tokio::test]
async fn path_change_replaces_file_row() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions::default());

    sync.add_update(&matrix(), "Movies", Some("1"), None).await.unwrap();
    let before = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();

    let mut moved = matrix();
    moved.file = Some("/archive/The Matrix (1999)/The Matrix.mkv".into());
    sync.add_update(&moved, "Movies", Some("1"), None).await.unwrap();

    let after = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();
    assert_ne!(after.file_id, before.file_id);
    assert!(files::get_file(&pool, &before.file_id).await.unwrap().is_none());
    assert!(files::get_file(&pool, &after.file_id).await.unwrap().is_some());
    assert_eq!(table_count(&pool, "file").await, 1);
}

#[tokio::test]
async fn excluded_section_is_a_noop() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = MovieSync::new(
        &pool,
        &catalog,
        SyncOptions::default(),
        SectionFilter::only(["2"]),
        0,
    );

    sync.add_update(&matrix(), "Movies", Some("1"), None).await.unwrap();

    assert_eq!(remote_items::count(&pool).await.unwrap(), 0);
    assert_eq!(table_count(&pool, "movie").await, 0);
    assert_eq!(table_count(&pool, "file").await, 0);
}

#[tokio::test]
async fn artwork_flag_gates_item_artwork() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions { direct_paths: false, artwork: false });

    sync.add_update(&matrix(), "Movies", Some("1"), None).await.unwrap();

    assert_eq!(table_count(&pool, "art").await, 0);
}

#[tokio::test]
async fn first_collection_is_structural_all_become_tags() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions::default());

    let mut rec = matrix();
    rec.collections = serde_json::from_value(json!([
        {"remoteSetId": "1", "name": "A"},
        {"remoteSetId": "2", "name": "B"}
    ]))
    .unwrap();

    sync.add_update(&rec, "Movies", Some("1"), None).await.unwrap();

    let entry = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();
    let set_id = sets::get_set_id(&pool, &entry.movie_id).await.unwrap().unwrap();
    assert_eq!(sets::get_set(&pool, &set_id).await.unwrap().as_deref(), Some("A"));
    assert_eq!(table_count(&pool, "movie_set").await, 1);

    let tags = labels::list_labels(&pool, LabelKind::Tag, &entry.movie_id, MediaKind::Movie)
        .await
        .unwrap();
    assert_eq!(tags, vec!["A", "B", "Movies"]);
}

#[tokio::test]
async fn collection_artwork_from_prefetched_children() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions { direct_paths: false, artwork: true });

    let mut rec = matrix();
    rec.collections =
        serde_json::from_value(json!([{"remoteSetId": "7", "name": "Matrix Collection"}]))
            .unwrap();

    let set_record = record(json!({
        "remoteId": "9001",
        "title": "Matrix Collection",
        "artwork": {"poster": "http://catalog/set/poster.jpg"}
    }));
    let children: HashMap<String, CatalogRecord> =
        [("7".to_string(), set_record)].into_iter().collect();

    sync.add_update(&rec, "Movies", Some("1"), Some(&children)).await.unwrap();

    let entry = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();
    let set_id = sets::get_set_id(&pool, &entry.movie_id).await.unwrap().unwrap();
    let art = artwork::list_artwork(&pool, &set_id, MediaKind::Set).await.unwrap();
    assert_eq!(art.get("poster").map(String::as_str), Some("http://catalog/set/poster.jpg"));
}

#[tokio::test]
async fn collection_artwork_fallback_queries_catalog() {
    let pool = test_pool().await;
    let set_record = record(json!({
        "remoteId": "9001",
        "title": "Matrix Collection",
        "artwork": {"poster": "http://catalog/set/poster.jpg"}
    }));
    let catalog = StubCatalog {
        records: [("9001".to_string(), set_record)].into_iter().collect(),
        collections: vec![("7".to_string(), "9001".to_string())],
        fail: false,
    };
    let sync = engine(&pool, &catalog, SyncOptions { direct_paths: false, artwork: true });

    let mut rec = matrix();
    rec.collections =
        serde_json::from_value(json!([{"remoteSetId": "7", "name": "Matrix Collection"}]))
            .unwrap();

    sync.add_update(&rec, "Movies", Some("1"), None).await.unwrap();

    let entry = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();
    let set_id = sets::get_set_id(&pool, &entry.movie_id).await.unwrap().unwrap();
    let art = artwork::list_artwork(&pool, &set_id, MediaKind::Set).await.unwrap();
    assert_eq!(art.len(), 1);
}

#[tokio::test]
async fn failed_collection_lookup_degrades_to_no_artwork() {
    let pool = test_pool().await;
    let catalog = StubCatalog {
        fail: true,
        ..Default::default()
    };
    let sync = engine(&pool, &catalog, SyncOptions { direct_paths: false, artwork: true });

    let mut rec = matrix();
    rec.collections =
        serde_json::from_value(json!([{"remoteSetId": "7", "name": "Matrix Collection"}]))
            .unwrap();

    sync.add_update(&rec, "Movies", Some("1"), None).await.unwrap();

    // Membership still created, artwork silently absent.
    let entry = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();
    let set_id = sets::get_set_id(&pool, &entry.movie_id).await.unwrap().unwrap();
    let art = artwork::list_artwork(&pool, &set_id, MediaKind::Set).await.unwrap();
    assert!(art.is_empty());
}

#[tokio::test]
async fn remove_leaves_no_orphans() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions { direct_paths: false, artwork: true });

    let mut rec = matrix();
    rec.collections =
        serde_json::from_value(json!([{"remoteSetId": "7", "name": "Matrix Collection"}]))
            .unwrap();
    sync.add_update(&rec, "Movies", Some("1"), None).await.unwrap();

    sync.remove("1001").await.unwrap();

    for table in [
        "remote_item",
        "movie",
        "file",
        "bookmark",
        "stream",
        "art",
        "rating",
        "unique_id",
        "person_link",
        "genre_link",
        "studio_link",
        "country_link",
        "tag_link",
        "movie_set",
    ] {
        assert_eq!(table_count(&pool, table).await, 0, "{table} not emptied");
    }
}

#[tokio::test]
async fn removing_unknown_remote_id_is_a_noop() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions::default());

    sync.remove("nope").await.unwrap();
}

#[tokio::test]
async fn set_survives_while_it_has_members() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions::default());

    let collections: Vec<shelfsync_catalog::record::CollectionRef> =
        serde_json::from_value(json!([{"remoteSetId": "7", "name": "Matrix Collection"}]))
            .unwrap();

    let mut first = matrix();
    first.collections = collections.clone();
    sync.add_update(&first, "Movies", Some("1"), None).await.unwrap();

    let mut second = matrix();
    second.remote_id = "1002".into();
    second.title = Some("The Matrix Reloaded".into());
    second.file = Some("/movies/The Matrix Reloaded (2003)/Reloaded.mkv".into());
    second.collections = collections;
    sync.add_update(&second, "Movies", Some("1"), None).await.unwrap();

    sync.remove("1001").await.unwrap();
    assert_eq!(table_count(&pool, "movie_set").await, 1);

    sync.remove("1002").await.unwrap();
    assert_eq!(table_count(&pool, "movie_set").await, 0);
}

#[tokio::test]
async fn userdata_on_unsynced_item_returns_false() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions::default());

    let synced = sync.update_userdata(&matrix()).await.unwrap();
    assert!(!synced);
    assert_eq!(table_count(&pool, "movie").await, 0);
    assert_eq!(table_count(&pool, "file").await, 0);
    assert_eq!(table_count(&pool, "bookmark").await, 0);
}

#[tokio::test]
async fn userdata_fast_path_touches_only_playstate() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions::default());

    sync.add_update(&matrix(), "Movies", Some("1"), None).await.unwrap();
    let entry = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();

    let mut watched = matrix();
    watched.title = Some("Renamed On The Server".into());
    watched.view_count = Some(2);
    watched.view_offset_secs = Some(1200.0);
    watched.last_viewed_at = Some(1_700_000_500);
    watched.user_rating = Some(10.0);

    let synced = sync.update_userdata(&watched).await.unwrap();
    assert!(synced);

    let resume = playstate::get_resume(&pool, &entry.file_id).await.unwrap().unwrap();
    assert_eq!(resume.0, 1200.0);

    let file = files::get_file(&pool, &entry.file_id).await.unwrap().unwrap();
    assert_eq!(file.play_count, Some(2));
    assert_eq!(file.last_played_ts, Some(1_700_000_500));

    // Everything outside the playstate tables is untouched.
    let movie = movies::get_movie(&pool, &entry.movie_id).await.unwrap().unwrap();
    assert_eq!(movie.title, "The Matrix");
    assert_eq!(movie.user_rating, Some(10.0));
}

#[tokio::test]
async fn direct_paths_store_scraper_metadata() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions { direct_paths: true, artwork: false });

    sync.add_update(&matrix(), "Movies", Some("1"), None).await.unwrap();

    let entry = remote_items::lookup(&pool, "1001").await.unwrap().unwrap();
    let row: (Option<String>, Option<String>) =
        sqlx::query_as("SELECT content, scraper FROM path WHERE id = ?")
            .bind(&entry.path_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(row.0.as_deref(), Some("movies"));
    assert_eq!(row.1.as_deref(), Some("metadata.local"));
}

#[tokio::test]
async fn missing_optional_fields_degrade_gracefully() {
    let pool = test_pool().await;
    let catalog = StubCatalog::default();
    let sync = engine(&pool, &catalog, SyncOptions { direct_paths: false, artwork: true });

    let bare = record(json!({
        "remoteId": "2001",
        "title": "Obscure Film",
        "file": "/movies/Obscure.mkv"
    }));
    sync.add_update(&bare, "Movies", Some("1"), None).await.unwrap();

    let entry = remote_items::lookup(&pool, "2001").await.unwrap().unwrap();
    let movie = movies::get_movie(&pool, &entry.movie_id).await.unwrap().unwrap();
    assert_eq!(movie.title, "Obscure Film");
    assert!(movie.unique_id.is_none());
    assert_eq!(
        unique_ids::list_unique_ids(&pool, &entry.movie_id, MediaKind::Movie)
            .await
            .unwrap()
            .len(),
        0
    );
    assert_eq!(ratings::count_ratings(&pool, &entry.movie_id, MediaKind::Movie).await.unwrap(), 1);
    assert!(playstate::get_resume(&pool, &entry.file_id).await.unwrap().is_none());
}
