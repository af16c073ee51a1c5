//! The remote metadata document for one catalog item.
//!
//! Read-only for the duration of a sync call. Every field may be absent;
//! accessors degrade to empty sets / `None` rather than failing.

use serde::{Deserialize, Serialize};
use shelfsync_core::types::PersonKind;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogRecord {
    pub remote_id: String,
    pub section_id: Option<String>,
    pub title: Option<String>,
    pub sort_title: Option<String>,
    pub plot: Option<String>,
    pub plot_outline: Option<String>,
    pub tagline: Option<String>,
    pub year: Option<i64>,
    pub premiere_date: Option<String>,
    pub content_rating: Option<String>,
    pub rating: Option<f64>,
    pub vote_count: Option<i64>,
    pub user_rating: Option<f64>,
    pub runtime_secs: Option<i64>,
    pub trailer: Option<String>,
    pub added_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub view_count: Option<i64>,
    pub view_offset_secs: Option<f64>,
    pub last_viewed_at: Option<i64>,
    pub file: Option<String>,
    pub people: Vec<PersonRef>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
    pub countries: Vec<String>,
    pub guids: Vec<String>,
    pub artwork: BTreeMap<String, String>,
    pub streams: Vec<StreamRef>,
    pub collections: Vec<CollectionRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub name: String,
    pub kind: PersonKind,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamRef {
    pub kind: String,
    pub codec: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub channels: Option<i64>,
    pub language: Option<String>,
    pub duration_secs: Option<i64>,
}

/// One collection membership reported by the catalog: the collection's
/// index within its section plus its display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRef {
    pub remote_set_id: String,
    pub name: String,
}

/// Primary media file location split into the pieces the library stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePath {
    pub full: String,
    pub dir: String,
    pub filename: String,
}

impl CatalogRecord {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Change-detection checksum: remote id plus the freshest timestamp
    /// the catalog reported for this record.
    pub fn checksum(&self) -> String {
        let stamp = self.updated_at.or(self.added_at).unwrap_or(0);
        format!("{}_{}", self.remote_id, stamp)
    }

    /// Creation date of the media file, as a date string for the file row.
    pub fn date_created(&self) -> Option<String> {
        let ts = self.added_at?;
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    /// Split the primary media path into (full, directory, filename).
    /// The directory keeps its trailing separator, matching how path rows
    /// are stored and looked up.
    pub fn full_path(&self) -> Option<FilePath> {
        let full = self.file.as_deref()?;
        let sep = if full.contains('\\') { '\\' } else { '/' };
        let cut = full.rfind(sep).map(|i| i + 1).unwrap_or(0);
        Some(FilePath {
            full: full.to_string(),
            dir: full[..cut].to_string(),
            filename: full[cut..].to_string(),
        })
    }

    /// Provider ids parsed from guids of the form `imdb://tt0133093`.
    /// Guids without a scheme separator are skipped.
    pub fn provider_ids(&self) -> Vec<(String, String)> {
        self.guids
            .iter()
            .filter_map(|guid| {
                let (provider, value) = guid.split_once("://")?;
                if provider.is_empty() || value.is_empty() {
                    return None;
                }
                Some((provider.to_string(), value.to_string()))
            })
            .collect()
    }

    /// Resume position in seconds; zero when the item is not in progress.
    pub fn resume_point(&self) -> f64 {
        self.view_offset_secs.unwrap_or(0.0)
    }

    pub fn writers(&self) -> Vec<&str> {
        self.people_of(PersonKind::Writer)
    }

    pub fn directors(&self) -> Vec<&str> {
        self.people_of(PersonKind::Director)
    }

    fn people_of(&self, kind: PersonKind) -> Vec<&str> {
        self.people
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// Join a name list the way the denormalized movie columns store it.
pub fn list_to_string(names: &[&str]) -> Option<String> {
    if names.is_empty() {
        None
    } else {
        Some(names.join(" / "))
    }
}
