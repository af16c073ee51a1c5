//! Movie reconciliation: insert-or-update, removal, and the playstate
//! fast path.

use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use shelfsync_catalog::client::CatalogClient;
use shelfsync_catalog::record::{list_to_string, CatalogRecord};
use shelfsync_core::types::{LabelKind, MediaKind};
use shelfsync_db::repo::{
    artwork, files, labels, movies, people, playstate, ratings, remote_items, sets, streams,
    unique_ids,
};

use crate::collections::process_collections;
use crate::config::{SectionFilter, SyncOptions};
use crate::identity::{self, Identity};
use crate::SyncError;

/// Reconciles remote movie records into the local library.
///
/// One instance covers one sync pass: the caller serializes calls per
/// section, and `last_sync_ts` stamps every mapping entry written during
/// the pass.
pub struct MovieSync<'a, C> {
    pool: &'a SqlitePool,
    catalog: &'a C,
    options: SyncOptions,
    filter: SectionFilter,
    last_sync_ts: i64,
}

impl<'a, C: CatalogClient> MovieSync<'a, C> {
    pub fn new(
        pool: &'a SqlitePool,
        catalog: &'a C,
        options: SyncOptions,
        filter: SectionFilter,
        last_sync_ts: i64,
    ) -> Self {
        Self {
            pool,
            catalog,
            options,
            filter,
            last_sync_ts,
        }
    }

    /// Process one movie record: insert the full fan-out on first sight,
    /// replace it wholesale on every later pass. The identity-mapping
    /// entry is committed last, after every row it points at exists.
    ///
    /// `children` is an optional caller-supplied prefetch of collection
    /// records keyed by collection index, used for batch syncs.
    pub async fn add_update(
        &self,
        record: &CatalogRecord,
        section_name: &str,
        section_id: Option<&str>,
        children: Option<&HashMap<String, CatalogRecord>>,
    ) -> Result<(), SyncError> {
        let section_id = section_id.or(record.section_id.as_deref());
        if !self.filter.allowed(section_id) {
            debug!(
                remote_id = %record.remote_id,
                title = record.title(),
                section_id = section_id.unwrap_or("?"),
                "skipping sync: section not synced to library"
            );
            return Ok(());
        }

        let Some(file_path) = record.full_path() else {
            warn!(
                remote_id = %record.remote_id,
                title = record.title(),
                "record has no media path, skipping"
            );
            return Ok(());
        };

        let identity = identity::resolve(self.pool, &record.remote_id).await?;
        let path_id =
            identity::resolve_path(self.pool, self.options, &file_path.dir, &file_path.full)
                .await?;

        // Gather the derived ids (file, rating) before the main row write,
        // which references them.
        let (movie_id, file_id) = match &identity {
            Identity::Existing {
                movie_id,
                file_id: old_file_id,
                ..
            } => {
                info!(remote_id = %record.remote_id, title = record.title(), "UPDATE movie");
                let file_id = files::modify_file(
                    self.pool,
                    &file_path.filename,
                    &path_id,
                    record.date_created().as_deref(),
                )
                .await?;
                // A path change yields a fresh file row; the stale one must
                // go, file rows are never duplicated per item.
                if file_id != *old_file_id {
                    files::remove_file(self.pool, old_file_id).await?;
                }
                (movie_id.clone(), file_id)
            }
            Identity::New { movie_id } => {
                info!(remote_id = %record.remote_id, title = record.title(), "ADD movie");
                let file_id = files::add_file(
                    self.pool,
                    &file_path.filename,
                    &path_id,
                    record.date_created().as_deref(),
                )
                .await?;
                (movie_id.clone(), file_id)
            }
        };

        let rating_id = ratings::upsert_rating(
            self.pool,
            &movie_id,
            MediaKind::Movie,
            "default",
            record.rating,
            record.vote_count,
        )
        .await?;

        let provider_ids = record.provider_ids();
        unique_ids::replace_unique_ids(self.pool, &movie_id, MediaKind::Movie, &provider_ids)
            .await?;

        let cast: Vec<people::PersonWrite> = record
            .people
            .iter()
            .map(|p| people::PersonWrite {
                name: p.name.clone(),
                kind: p.kind,
                role: p.role.clone(),
                thumb_url: p.thumb_url.clone(),
            })
            .collect();
        people::replace_people(self.pool, &movie_id, MediaKind::Movie, &cast).await?;

        if self.options.artwork {
            artwork::replace_artwork(self.pool, &record.artwork, &movie_id, MediaKind::Movie)
                .await?;
        }

        // Main row write, after every id it references exists.
        let movie = movies::MovieWrite {
            file_id: file_id.clone(),
            path_id: path_id.clone(),
            rating_id: Some(rating_id),
            unique_id: primary_provider_id(&provider_ids),
            title: record.title().to_string(),
            sort_title: record.sort_title.clone(),
            plot: record.plot.clone(),
            plot_outline: record.plot_outline.clone(),
            tagline: record.tagline.clone(),
            votes: record.vote_count,
            year: record.year,
            runtime_secs: record.runtime_secs,
            content_rating: record.content_rating.clone(),
            premiered: record.premiere_date.clone(),
            trailer: record.trailer.clone(),
            user_rating: record.user_rating,
            full_path: Some(file_path.full.clone()),
            writers: list_to_string(&record.writers()),
            directors: list_to_string(&record.directors()),
            genres: opt_join(&record.genres),
            studios: opt_join(&record.studios),
            countries: opt_join(&record.countries),
        };
        movies::upsert_movie(self.pool, &movie_id, &movie).await?;

        // Always-replace association sets, every pass, both branches.
        labels::replace_labels(
            self.pool,
            LabelKind::Country,
            &movie_id,
            MediaKind::Movie,
            &record.countries,
        )
        .await?;
        labels::replace_labels(
            self.pool,
            LabelKind::Genre,
            &movie_id,
            MediaKind::Movie,
            &record.genres,
        )
        .await?;
        labels::replace_labels(
            self.pool,
            LabelKind::Studio,
            &movie_id,
            MediaKind::Movie,
            &record.studios,
        )
        .await?;

        let stream_rows: Vec<streams::StreamWrite> = record
            .streams
            .iter()
            .map(|s| streams::StreamWrite {
                kind: s.kind.clone(),
                codec: s.codec.clone(),
                width: s.width,
                height: s.height,
                channels: s.channels,
                language: s.language.clone(),
                duration_secs: s.duration_secs,
            })
            .collect();
        streams::replace_streams(self.pool, &file_id, &stream_rows, record.runtime_secs).await?;

        let mut tags = vec![section_name.to_string()];
        process_collections(
            self.pool,
            self.catalog,
            self.options,
            record,
            &mut tags,
            &movie_id,
            section_id,
            children,
        )
        .await?;
        labels::replace_labels(self.pool, LabelKind::Tag, &movie_id, MediaKind::Movie, &tags)
            .await?;

        playstate::set_resume(
            self.pool,
            &file_id,
            record.resume_point(),
            record.runtime_secs,
            record.view_count,
            record.last_viewed_at,
        )
        .await?;

        // Commit the mapping entry last: the next pass reads it, so it
        // must never point at partially-written rows.
        remote_items::upsert(
            self.pool,
            &remote_items::RemoteItemRow {
                remote_id: record.remote_id.clone(),
                checksum: record.checksum(),
                section_id: section_id.map(str::to_string),
                movie_id,
                file_id,
                path_id,
                last_sync_ts: self.last_sync_ts,
            },
        )
        .await?;

        Ok(())
    }

    /// Remove a movie with all references and all orphaned associated
    /// rows. An unknown remote id is a logged no-op.
    pub async fn remove(&self, remote_id: &str) -> Result<(), SyncError> {
        let Some(entry) = remote_items::lookup(self.pool, remote_id).await? else {
            warn!(remote_id, "movie not found in mapping, cannot delete");
            return Ok(());
        };
        let movie_id = entry.movie_id;
        let file_id = entry.file_id;
        debug!(remote_id, movie_id = %movie_id, "removing movie");

        // Sever the remote link first so a concurrent update cannot
        // resurrect the item mid-deletion.
        remote_items::delete(self.pool, remote_id).await?;

        artwork::delete_artwork(self.pool, &movie_id, MediaKind::Movie).await?;
        // Capture set membership before the movie row goes away.
        let set_id = sets::get_set_id(self.pool, &movie_id).await?;

        labels::replace_labels(self.pool, LabelKind::Country, &movie_id, MediaKind::Movie, &[])
            .await?;
        people::replace_people(self.pool, &movie_id, MediaKind::Movie, &[]).await?;
        labels::replace_labels(self.pool, LabelKind::Genre, &movie_id, MediaKind::Movie, &[])
            .await?;
        labels::replace_labels(self.pool, LabelKind::Studio, &movie_id, MediaKind::Movie, &[])
            .await?;
        labels::replace_labels(self.pool, LabelKind::Tag, &movie_id, MediaKind::Movie, &[])
            .await?;

        files::remove_file(self.pool, &file_id).await?;
        movies::remove_movie(self.pool, &movie_id).await?;

        if let Some(set_id) = set_id {
            sets::delete_possibly_empty_set(self.pool, &set_id).await?;
        }

        unique_ids::remove_unique_ids(self.pool, &movie_id, MediaKind::Movie).await?;
        ratings::remove_ratings(self.pool, &movie_id, MediaKind::Movie).await?;

        debug!(remote_id, "deleted movie from library");
        Ok(())
    }

    /// Playstate fast path: write only resume position, play counts and
    /// user rating. Returns `false` when the item was never synced, so
    /// the caller may fall back to a full [`Self::add_update`].
    pub async fn update_userdata(&self, record: &CatalogRecord) -> Result<bool, SyncError> {
        let Some(entry) = remote_items::lookup(self.pool, &record.remote_id).await? else {
            info!(remote_id = %record.remote_id, "item not yet synced");
            return Ok(false);
        };

        playstate::set_resume(
            self.pool,
            &entry.file_id,
            record.resume_point(),
            record.runtime_secs,
            record.view_count,
            record.last_viewed_at,
        )
        .await?;
        movies::set_user_rating(self.pool, &entry.movie_id, record.user_rating).await?;

        Ok(true)
    }
}

/// Pick the single provider id stored on the main movie row.
/// Precedence: imdb > tmdb > tvdb.
fn primary_provider_id(ids: &[(String, String)]) -> Option<String> {
    for provider in ["imdb", "tmdb", "tvdb"] {
        if let Some((_, value)) = ids.iter().find(|(p, _)| p == provider) {
            return Some(value.clone());
        }
    }
    None
}

fn opt_join(names: &[String]) -> Option<String> {
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    list_to_string(&refs)
}
