use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub mod history;
pub mod preference;
pub mod user;
pub mod vocabulary;

pub use history::WatchHistoryEntry;
pub use preference::{
    Disposition, Preference, PreferenceType, PreferencesRequest, RawPreference, WeightedPreference,
};
pub use user::{User, UserProfile};

/// Separator between the document scheme and the user-specified local id
const LOCAL_ID_SEPARATOR: &str = "::";

/// Vespa document id split at its local-id separator, e.g.
/// `id:films:film::film-7` has scheme `id:films:film` and local id `film-7`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId {
    pub scheme: String,
    pub local_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed document id: {0}")]
pub struct DocumentIdError(String);

impl FromStr for DocumentId {
    type Err = DocumentIdError;

    /// Requires exactly one `::`; the scheme part is not interpreted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(LOCAL_ID_SEPARATOR) {
            Some((scheme, local_id)) if !local_id.contains(LOCAL_ID_SEPARATOR) => Ok(DocumentId {
                scheme: scheme.to_string(),
                local_id: local_id.to_string(),
            }),
            _ => Err(DocumentIdError(s.to_string())),
        }
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.scheme, LOCAL_ID_SEPARATOR, self.local_id)
    }
}

// ============================================================================
// Vespa search API types
// ============================================================================

/// Search response, in the engine's own shape. The same shape is returned to
/// the browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub root: SearchRoot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRoot {
    #[serde(default)]
    pub fields: SearchRootFields,
    #[serde(default)]
    pub children: Vec<SearchHit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRootFields {
    #[serde(rename = "totalCount", default)]
    pub total_count: u64,
}

/// A single hit returned by the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    #[serde(default)]
    pub relevance: f64,
    #[serde(default)]
    pub fields: FilmFields,
}

/// Document fields of the `film` schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmFields {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub director: String,
    pub year: i32,
    pub rating: f64,
    pub tags: Vec<String>,
    pub cast: Vec<String>,
}

impl SearchHit {
    pub fn document_id(&self) -> Option<DocumentId> {
        self.id.parse().ok()
    }
}

impl SearchResultSet {
    /// Builds a result set whose reported total equals the number of hits
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            root: SearchRoot {
                fields: SearchRootFields {
                    total_count: hits.len() as u64,
                },
                children: hits,
            },
        }
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.root.children
    }

    pub fn total_count(&self) -> u64 {
        self.root.fields.total_count
    }
}
