use serde::{Deserialize, Serialize};

use super::Preference;

/// A seeded demo user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// A user together with its current preference set, as listed by `GET /api/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub preferences: Vec<Preference>,
}

impl UserProfile {
    pub fn new(user: User, preferences: Vec<Preference>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            preferences,
        }
    }
}
