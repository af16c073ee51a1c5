//! Collection/set handling for one synced movie.
//!
//! Every collection name the catalog reports becomes a tag, but the local
//! schema stores a single `set_id` per movie, so structural membership is
//! single-valued: the first reported collection is taken, the rest are
//! tags only.

use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, error};

use shelfsync_catalog::client::CatalogClient;
use shelfsync_catalog::record::CatalogRecord;
use shelfsync_core::types::MediaKind;
use shelfsync_db::repo::{artwork, sets};

use crate::config::SyncOptions;

pub(crate) async fn process_collections<C: CatalogClient>(
    pool: &SqlitePool,
    catalog: &C,
    options: SyncOptions,
    record: &CatalogRecord,
    tags: &mut Vec<String>,
    movie_id: &str,
    section_id: Option<&str>,
    children: Option<&HashMap<String, CatalogRecord>>,
) -> Result<(), sqlx::Error> {
    for collection in &record.collections {
        tags.push(collection.name.clone());
    }

    // Take the first reported collection for structural membership,
    // else none.
    let Some(first) = record.collections.first() else {
        sets::clear_set(pool, movie_id).await?;
        return Ok(());
    };

    let set_id = sets::create_set(pool, &first.name).await?;
    sets::assign_set(pool, &set_id, movie_id).await?;

    if !options.artwork {
        return Ok(());
    }

    // Collection artwork comes from the caller's prefetch map when one was
    // supplied (batch syncs); otherwise fall back to a catalog lookup.
    // Lookup failures degrade to "no artwork", never abort the sync.
    let set_record = match children {
        Some(map) => map.get(&first.remote_set_id).cloned(),
        None => fallback_lookup(catalog, section_id, &first.remote_set_id, &first.name).await,
    };

    if let Some(set_record) = set_record {
        artwork::replace_artwork(pool, &set_record.artwork, &set_id, MediaKind::Set).await?;
    }

    Ok(())
}

/// Scan the section's collections for the one matching this movie's
/// collection index and fetch its metadata record.
async fn fallback_lookup<C: CatalogClient>(
    catalog: &C,
    section_id: Option<&str>,
    remote_set_id: &str,
    name: &str,
) -> Option<CatalogRecord> {
    let section_id = section_id?;
    debug!(remote_set_id, name, "costly catalog lookup for collection artwork");

    let listing = match catalog.section_collections(section_id).await {
        Ok(listing) => listing,
        Err(e) => {
            error!(section_id, error = %e, "could not list section collections");
            return None;
        }
    };

    for (index, remote_id) in listing {
        if index != remote_set_id {
            continue;
        }
        match catalog.fetch_record(&remote_id).await {
            Ok(record) => return Some(record),
            Err(e) => {
                error!(remote_id = %remote_id, error = %e, "could not get collection metadata");
                continue;
            }
        }
    }

    None
}
