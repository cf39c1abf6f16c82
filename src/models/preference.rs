use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Taxonomy a preference value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PreferenceType {
    Genre,
    Tag,
}

impl Display for PreferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferenceType::Genre => write!(f, "genre"),
            PreferenceType::Tag => write!(f, "tag"),
        }
    }
}

/// Like/dislike state. Neutral is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Disposition {
    Like,
    Dislike,
}

impl Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disposition::Like => write!(f, "like"),
            Disposition::Dislike => write!(f, "dislike"),
        }
    }
}

/// A single stored preference of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Preference {
    #[serde(rename = "type")]
    pub kind: PreferenceType,
    pub value: String,
    pub state: Disposition,
}

impl Preference {
    pub fn new(kind: PreferenceType, value: impl Into<String>, state: Disposition) -> Self {
        Self {
            kind,
            value: value.into(),
            state,
        }
    }
}

/// Loosely typed preference, as sent in the `prefs` search parameter
///
/// Entries naming an unknown type or state still count toward the list but
/// never land in a weighting group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPreference {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub state: String,
}

impl From<Preference> for RawPreference {
    fn from(preference: Preference) -> Self {
        Self {
            kind: preference.kind.to_string(),
            value: preference.value,
            state: preference.state.to_string(),
        }
    }
}

/// Input of the ranking weights: a (type, state) group and a value
pub trait WeightedPreference {
    /// `None` when the entry belongs to no weighting group
    fn group(&self) -> Option<(PreferenceType, Disposition)>;

    fn value(&self) -> &str;
}

impl WeightedPreference for Preference {
    fn group(&self) -> Option<(PreferenceType, Disposition)> {
        Some((self.kind, self.state))
    }

    fn value(&self) -> &str {
        &self.value
    }
}

impl WeightedPreference for RawPreference {
    fn group(&self) -> Option<(PreferenceType, Disposition)> {
        let kind = match self.kind.as_str() {
            "genre" => PreferenceType::Genre,
            "tag" => PreferenceType::Tag,
            _ => return None,
        };
        let state = match self.state.as_str() {
            "like" => Disposition::Like,
            "dislike" => Disposition::Dislike,
            _ => return None,
        };
        Some((kind, state))
    }

    fn value(&self) -> &str {
        &self.value
    }
}

/// Body of `PUT /api/users/{id}/preferences`. A missing list clears the set.
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesRequest {
    #[serde(default)]
    pub preferences: Vec<Preference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_json_shape() {
        let pref = Preference::new(PreferenceType::Genre, "Sci-Fi", Disposition::Like);
        let json = serde_json::to_value(&pref).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "genre", "value": "Sci-Fi", "state": "like" })
        );
    }

    #[test]
    fn test_unknown_type_or_state_fails_to_decode() {
        let bad_type = r#"{"type":"mood","value":"dark","state":"like"}"#;
        assert!(serde_json::from_str::<Preference>(bad_type).is_err());

        let bad_state = r#"{"type":"tag","value":"indie","state":"neutral"}"#;
        assert!(serde_json::from_str::<Preference>(bad_state).is_err());
    }

    #[test]
    fn test_missing_preference_list_decodes_as_empty() {
        let request: PreferencesRequest = serde_json::from_str("{}").unwrap();
        assert!(request.preferences.is_empty());
    }

    #[test]
    fn test_raw_preference_groups() {
        let raw: Vec<RawPreference> = serde_json::from_str(
            r#"[
                {"type":"genre","value":"Drama","state":"like"},
                {"type":"tag","value":"indie","state":"dislike"},
                {"type":"genre","value":"Drama","state":"neutral"},
                {"type":"mood","value":"dark","state":"like"},
                {"type":"Genre","value":"Drama","state":"like"},
                {"value":"Drama"}
            ]"#,
        )
        .unwrap();

        let groups: Vec<_> = raw.iter().map(|p| p.group()).collect();
        assert_eq!(
            groups,
            vec![
                Some((PreferenceType::Genre, Disposition::Like)),
                Some((PreferenceType::Tag, Disposition::Dislike)),
                None,
                None,
                None,
                None,
            ]
        );
        assert_eq!(raw[5].kind, "");
        assert_eq!(raw[5].value(), "Drama");
    }

    #[test]
    fn test_raw_preference_from_stored() {
        let raw = RawPreference::from(Preference::new(
            PreferenceType::Tag,
            "sequel",
            Disposition::Dislike,
        ));
        assert_eq!(raw.kind, "tag");
        assert_eq!(raw.state, "dislike");
        assert_eq!(
            raw.group(),
            Some((PreferenceType::Tag, Disposition::Dislike))
        );
    }

    #[test]
    fn test_preference_type_display() {
        assert_eq!(PreferenceType::Genre.to_string(), "genre");
        assert_eq!(PreferenceType::Tag.to_string(), "tag");
    }
}
