use serde::{Deserialize, Serialize};

/// Media kind stored in the `media_type` column of every shared
/// association table (art, links, ratings, unique ids).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Set,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Set => "set",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a person plays in a movie, stored in `person_link.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
    Actor,
    Director,
    Writer,
}

impl PersonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Director => "director",
            Self::Writer => "writer",
        }
    }
}

impl std::fmt::Display for PersonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four label table families that hang off a movie.
/// Each has a `<name>` table and a `<name>_link` association table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Genre,
    Studio,
    Country,
    Tag,
}

impl LabelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::Studio => "studio",
            Self::Country => "country",
            Self::Tag => "tag",
        }
    }
}

impl std::fmt::Display for LabelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
