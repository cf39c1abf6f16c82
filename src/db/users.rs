use crate::{
    error::AppResult,
    models::{User, UserProfile},
};

use super::Store;

impl Store {
    pub async fn user_exists(&self, user_id: &str) -> AppResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(self.pool())
            .await?;
        Ok(count > 0)
    }

    pub async fn count_users(&self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Lists every user ordered by id, each with its preference set
    pub async fn list_users(&self) -> AppResult<Vec<UserProfile>> {
        let users = sqlx::query_as::<_, User>("SELECT id, name FROM users ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        let mut profiles = Vec::with_capacity(users.len());
        for user in users {
            let preferences = self.preferences_for(&user.id).await?;
            profiles.push(UserProfile::new(user, preferences));
        }

        Ok(profiles)
    }

    pub async fn insert_user(&self, user: &User) -> AppResult<()> {
        sqlx::query("INSERT INTO users (id, name) VALUES (?, ?)")
            .bind(&user.id)
            .bind(&user.name)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
