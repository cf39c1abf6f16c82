use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::WatchHistoryEntry,
};

use super::Store;

/// Row shape of `watch_history`; tags are kept as a JSON array string
#[derive(sqlx::FromRow)]
struct WatchHistoryRow {
    film_id: String,
    film_title: String,
    film_genre: String,
    film_year: i32,
    film_tags: String,
    user_rating: i32,
}

impl From<WatchHistoryRow> for WatchHistoryEntry {
    fn from(row: WatchHistoryRow) -> Self {
        let film_tags = serde_json::from_str::<Option<Vec<String>>>(&row.film_tags)
            .ok()
            .flatten()
            .unwrap_or_default();

        WatchHistoryEntry {
            film_id: row.film_id,
            film_title: row.film_title,
            film_genre: row.film_genre,
            film_year: row.film_year,
            film_tags,
            user_rating: row.user_rating,
        }
    }
}

impl Store {
    /// Watch history of a user, most recent first
    pub async fn history_for(&self, user_id: &str) -> AppResult<Vec<WatchHistoryEntry>> {
        let rows = sqlx::query_as::<_, WatchHistoryRow>(
            r#"
            SELECT film_id, film_title, film_genre, film_year, film_tags, user_rating
            FROM watch_history
            WHERE user_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(WatchHistoryEntry::from).collect())
    }

    /// Distinct film ids a user has watched
    pub async fn watched_film_ids(&self, user_id: &str) -> AppResult<HashSet<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT film_id FROM watch_history WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(self.pool())
                .await?;

        Ok(rows.into_iter().map(|(film_id,)| film_id).collect())
    }

    /// Appends one watch event. The rating must already be validated.
    pub async fn add_history(&self, user_id: &str, entry: &WatchHistoryEntry) -> AppResult<()> {
        let tags = serde_json::to_string(&entry.film_tags)
            .map_err(|e| AppError::Internal(format!("Tag serialization error: {}", e)))?;

        sqlx::query(
            "INSERT INTO watch_history \
             (user_id, film_id, film_title, film_genre, film_year, film_tags, user_rating) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&entry.film_id)
        .bind(&entry.film_title)
        .bind(&entry.film_genre)
        .bind(entry.film_year)
        .bind(tags)
        .bind(entry.user_rating)
        .execute(self.pool())
        .await?;

        tracing::info!(
            user_id = %user_id,
            film_id = %entry.film_id,
            rating = entry.user_rating,
            "Watch history entry added"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn entry(film_id: &str, rating: i32) -> WatchHistoryEntry {
        WatchHistoryEntry {
            film_id: film_id.to_string(),
            film_title: format!("Film {}", film_id),
            film_genre: "Action".to_string(),
            film_year: 2020,
            film_tags: vec!["blockbuster".to_string(), "visually-stunning".to_string()],
            user_rating: rating,
        }
    }

    async fn store_with_user() -> Store {
        let store = Store::in_memory().await.unwrap();
        store
            .insert_user(&User {
                id: "1".to_string(),
                name: "TestUser".to_string(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let store = store_with_user().await;
        store.add_history("1", &entry("film-1", 4)).await.unwrap();
        store.add_history("1", &entry("film-2", 2)).await.unwrap();

        let history = store.history_for("1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].film_id, "film-2");
        assert_eq!(history[1].film_id, "film-1");
        assert_eq!(history[1].film_tags.len(), 2);
        assert_eq!(history[1].user_rating, 4);
    }

    #[tokio::test]
    async fn test_rewatch_is_not_deduplicated() {
        let store = store_with_user().await;
        store.add_history("1", &entry("film-1", 3)).await.unwrap();
        store.add_history("1", &entry("film-1", 5)).await.unwrap();

        assert_eq!(store.history_for("1").await.unwrap().len(), 2);
        let watched = store.watched_film_ids("1").await.unwrap();
        assert_eq!(watched.len(), 1);
        assert!(watched.contains("film-1"));
    }

    #[tokio::test]
    async fn test_unreadable_tags_decode_as_empty() {
        let store = store_with_user().await;
        sqlx::query(
            "INSERT INTO watch_history \
             (user_id, film_id, film_title, film_genre, film_year, film_tags, user_rating) \
             VALUES ('1', 'legacy', 'Legacy', 'Drama', 1990, 'not json', 3), \
                    ('1', 'nulls', 'Nulls', 'Drama', 1991, 'null', 3)",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let history = store.history_for("1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.film_tags.is_empty()));
    }

    #[tokio::test]
    async fn test_out_of_range_rating_rejected_by_schema() {
        let store = store_with_user().await;
        assert!(store.add_history("1", &entry("film-9", 6)).await.is_err());
        assert!(store.history_for("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_history() {
        let store = store_with_user().await;
        assert!(store.history_for("1").await.unwrap().is_empty());
        assert!(store.watched_film_ids("1").await.unwrap().is_empty());
    }
}
