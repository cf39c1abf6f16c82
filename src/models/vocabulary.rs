use crate::error::{AppError, AppResult};

use super::{Preference, PreferenceType};

/// Genres a stored preference may name
pub const GENRES: [&str; 10] = [
    "Action",
    "Comedy",
    "Drama",
    "Sci-Fi",
    "Horror",
    "Romance",
    "Thriller",
    "Animation",
    "Adventure",
    "Crime",
];

/// Tags a stored preference may name
pub const TAGS: [&str; 10] = [
    "classic",
    "oscar-winner",
    "cult-favorite",
    "blockbuster",
    "indie",
    "adaptation",
    "sequel",
    "ensemble-cast",
    "visually-stunning",
    "thought-provoking",
];

pub const MAX_PREFERENCE_VALUE_LENGTH: usize = 50;
pub const MAX_QUERY_LENGTH: usize = 500;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Syntax check for values that end up inside a ranking input.
///
/// Only `[A-Za-z0-9_-]`, 1 to 50 characters. This does not consult the
/// vocabularies.
pub fn is_valid_preference_value(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_PREFERENCE_VALUE_LENGTH
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl PreferenceType {
    /// Whether `value` belongs to this type's closed vocabulary
    pub fn accepts(self, value: &str) -> bool {
        match self {
            PreferenceType::Genre => GENRES.contains(&value),
            PreferenceType::Tag => TAGS.contains(&value),
        }
    }
}

/// Validates a full replacement set. The first out-of-vocabulary value
/// rejects the whole batch.
pub fn validate_preferences(preferences: &[Preference]) -> AppResult<()> {
    for preference in preferences {
        if !preference.kind.accepts(&preference.value) {
            return Err(AppError::InvalidInput(format!(
                "Invalid {}: {}",
                preference.kind, preference.value
            )));
        }
    }
    Ok(())
}

pub fn validate_rating(rating: i32) -> AppResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}

pub fn validate_query_length(query: &str) -> AppResult<()> {
    if query.chars().count() > MAX_QUERY_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Query too long (max {} characters)",
            MAX_QUERY_LENGTH
        )));
    }
    Ok(())
}
