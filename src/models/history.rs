use serde::{Deserialize, Serialize};

/// One watch event of a user. Also the body of `POST /api/users/{id}/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchHistoryEntry {
    pub film_id: String,
    pub film_title: String,
    #[serde(default)]
    pub film_genre: String,
    #[serde(default)]
    pub film_year: i32,
    #[serde(default)]
    pub film_tags: Vec<String>,
    /// Missing ratings decode as 0 so they fail range validation
    #[serde(default)]
    pub user_rating: i32,
}
