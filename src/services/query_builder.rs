use reqwest::Url;

use crate::models::{
    vocabulary::is_valid_preference_value, Disposition, PreferenceType, WeightedPreference,
};

/// Free-text value meaning "match everything"
pub const WILDCARD_QUERY: &str = "*";

/// Rank profile defined in the film schema that reads the preference inputs
const PERSONALIZED_PROFILE: &str = "personalized";

const MATCH_ALL_YQL: &str = "select * from film where true";
const USER_QUERY_YQL: &str = "select * from film where userQuery()";

/// Ranking inputs, one per (type, disposition) group
const WEIGHTING_INPUTS: [(PreferenceType, Disposition, &str); 4] = [
    (PreferenceType::Genre, Disposition::Like, "input.query(genre_boost)"),
    (PreferenceType::Genre, Disposition::Dislike, "input.query(genre_penalty)"),
    (PreferenceType::Tag, Disposition::Like, "input.query(tag_boost)"),
    (PreferenceType::Tag, Disposition::Dislike, "input.query(tag_penalty)"),
];

/// Translates a free-text query and a preference set into a Vespa search URL
///
/// Every call rebuilds the request from scratch.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    search_url: Url,
}

impl QueryBuilder {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let mut search_url = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("Invalid search engine URL {}: {}", base_url, e))?;
        let path = format!("{}/search/", search_url.path().trim_end_matches('/'));
        search_url.set_path(&path);
        search_url.set_query(None);

        Ok(Self { search_url })
    }

    /// Builds the request URL.
    ///
    /// Empty text or `*` matches every document. Entries outside the four
    /// weighting groups and values failing the syntax check are dropped
    /// without error. The personalized rank profile is selected whenever
    /// `preferences` is non-empty, even if every entry was dropped.
    pub fn build<P: WeightedPreference>(
        &self,
        free_text: &str,
        preferences: &[P],
        hits: usize,
    ) -> Url {
        let mut url = self.search_url.clone();

        {
            let mut params = url.query_pairs_mut();

            if is_match_all(free_text) {
                params.append_pair("yql", MATCH_ALL_YQL);
            } else {
                params.append_pair("yql", USER_QUERY_YQL);
                params.append_pair("query", free_text);
            }

            params.append_pair("hits", &hits.to_string());

            if !preferences.is_empty() {
                params.append_pair("ranking.profile", PERSONALIZED_PROFILE);

                for (kind, state, input) in WEIGHTING_INPUTS {
                    if let Some(tensor) = weighting_tensor(preferences, kind, state) {
                        params.append_pair(input, &tensor);
                    }
                }
            }
        }

        url
    }
}

fn is_match_all(free_text: &str) -> bool {
    free_text.is_empty() || free_text == WILDCARD_QUERY
}

/// Mapped tensor literal such as `{{genre:Action}:1,{genre:Sci-Fi}:1}`, or
/// `None` when the group has no usable value
fn weighting_tensor<P: WeightedPreference>(
    preferences: &[P],
    kind: PreferenceType,
    state: Disposition,
) -> Option<String> {
    let cells: Vec<String> = preferences
        .iter()
        .filter(|p| p.group() == Some((kind, state)))
        .filter(|p| is_valid_preference_value(p.value()))
        .map(|p| format!("{{{}:{}}}:1", kind, p.value()))
        .collect();

    if cells.is_empty() {
        None
    } else {
        Some(format!("{{{}}}", cells.join(",")))
    }
}
