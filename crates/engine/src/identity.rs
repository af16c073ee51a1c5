//! Identity resolution: does a remote record already exist locally?

use sqlx::SqlitePool;

use crate::config::SyncOptions;
use shelfsync_db::repo::{movies, paths, remote_items};

/// Outcome of looking up a remote id in the identity-mapping store.
#[derive(Debug, Clone)]
pub enum Identity {
    /// The item was synced before: reuse its local ids (update path).
    Existing {
        movie_id: String,
        file_id: String,
        path_id: String,
    },
    /// First sight of this remote id: a fresh movie id is allocated, the
    /// path and file ids are produced by the write phase (insert path).
    New { movie_id: String },
}

/// Look up the mapping entry for a remote id. Read-only; nothing is
/// written until the write phase.
pub async fn resolve(pool: &SqlitePool, remote_id: &str) -> Result<Identity, sqlx::Error> {
    match remote_items::lookup(pool, remote_id).await? {
        Some(entry) => Ok(Identity::Existing {
            movie_id: entry.movie_id,
            file_id: entry.file_id,
            path_id: entry.path_id,
        }),
        None => Ok(Identity::New {
            movie_id: movies::new_movie_id(),
        }),
    }
}

/// Resolve (or create) the path row for a media file directory.
///
/// Direct-paths mode stores the real filesystem path with scraper
/// metadata so the library treats it as local content; everything else
/// (including http sources regardless of mode) gets a bare library path.
pub async fn resolve_path(
    pool: &SqlitePool,
    options: SyncOptions,
    dir: &str,
    full_path: &str,
) -> Result<String, sqlx::Error> {
    if options.direct_paths && !full_path.starts_with("http") {
        paths::add_path(pool, dir, "movies", "metadata.local").await
    } else {
        paths::get_path(pool, dir).await
    }
}
