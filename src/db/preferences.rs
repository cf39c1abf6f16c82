use crate::{error::AppResult, models::Preference};

use super::Store;

impl Store {
    /// Current preference set of a user; empty for unknown users
    pub async fn preferences_for(&self, user_id: &str) -> AppResult<Vec<Preference>> {
        let preferences = sqlx::query_as::<_, Preference>(
            r#"
            SELECT pref_type AS kind, pref_value AS value, pref_state AS state
            FROM user_preferences
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(preferences)
    }

    /// Replaces the whole preference set of a user in one transaction.
    ///
    /// Readers see either the previous set or the new one. Callers validate
    /// the batch before calling.
    pub async fn replace_preferences(
        &self,
        user_id: &str,
        preferences: &[Preference],
    ) -> AppResult<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM user_preferences WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for preference in preferences {
            sqlx::query(
                "INSERT INTO user_preferences (user_id, pref_type, pref_value, pref_state) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(user_id)
            .bind(preference.kind)
            .bind(&preference.value)
            .bind(preference.state)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            count = preferences.len(),
            "Preferences updated"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Disposition, PreferenceType, User};

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
    async fn test_preferences_for_unknown_user_is_empty() {
        let store = Store::in_memory().await.unwrap();
        assert!(store.preferences_for("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_preferences_overwrites_previous_set() {
        let store = store_with_user().await;

        store
            .replace_preferences(
                "1",
                &[
                    Preference::new(PreferenceType::Genre, "Action", Disposition::Like),
                    Preference::new(PreferenceType::Tag, "classic", Disposition::Dislike),
                ],
            )
            .await
            .unwrap();

        store
            .replace_preferences(
                "1",
                &[Preference::new(PreferenceType::Genre, "Drama", Disposition::Dislike)],
            )
            .await
            .unwrap();

        let prefs = store.preferences_for("1").await.unwrap();
        assert_eq!(
            prefs,
            vec![Preference::new(PreferenceType::Genre, "Drama", Disposition::Dislike)]
        );
    }

    #[tokio::test]
    async fn test_replace_with_empty_set_clears_preferences() {
        let store = store_with_user().await;
        store
            .replace_preferences(
                "1",
                &[Preference::new(PreferenceType::Tag, "indie", Disposition::Like)],
            )
            .await
            .unwrap();

        store.replace_preferences("1", &[]).await.unwrap();

        assert!(store.preferences_for("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_replace_commits_nothing() {
        let store = store_with_user().await;
        let original = vec![Preference::new(
            PreferenceType::Genre,
            "Comedy",
            Disposition::Like,
        )];
        store.replace_preferences("1", &original).await.unwrap();

        // Foreign key violation on an unknown user aborts the batch midway.
        let result = store
            .replace_preferences(
                "ghost",
                &[Preference::new(PreferenceType::Genre, "Crime", Disposition::Like)],
            )
            .await;
        assert!(result.is_err());

        assert_eq!(store.preferences_for("1").await.unwrap(), original);
        assert!(store.preferences_for("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stored_values_round_trip_lowercase() {
        let store = store_with_user().await;
        store
            .replace_preferences(
                "1",
                &[Preference::new(PreferenceType::Tag, "sequel", Disposition::Dislike)],
            )
            .await
            .unwrap();

        let (pref_type, pref_state): (String, String) = sqlx::query_as(
            "SELECT pref_type, pref_state FROM user_preferences WHERE user_id = '1'",
        )
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!(pref_type, "tag");
        assert_eq!(pref_state, "dislike");
    }
}
