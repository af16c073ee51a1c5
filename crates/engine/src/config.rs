use std::collections::HashSet;

/// Sync behavior flags, passed explicitly so each call is reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Store real filesystem paths with scraper metadata instead of
    /// catalog-keyed library paths.
    pub direct_paths: bool,
    /// Whether artwork is synced at all (items and collections).
    pub artwork: bool,
}

/// Which library sections are eligible for sync.
#[derive(Debug, Clone, Default)]
pub struct SectionFilter {
    enabled: Option<HashSet<String>>,
}

impl SectionFilter {
    /// Allow every section.
    pub fn all() -> Self {
        Self { enabled: None }
    }

    /// Allow only the given sections.
    pub fn only<I>(sections: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            enabled: Some(sections.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether an item in the given section should be synced. A restricted
    /// filter rejects items whose section is unknown.
    pub fn allowed(&self, section_id: Option<&str>) -> bool {
        match &self.enabled {
            None => true,
            Some(sections) => section_id.is_some_and(|id| sections.contains(id)),
        }
    }
}
