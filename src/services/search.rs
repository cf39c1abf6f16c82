use crate::{
    db::Store,
    error::AppResult,
    models::{vocabulary::validate_query_length, RawPreference, SearchResultSet},
    services::{query_builder::QueryBuilder, search_engine::SearchEngine},
};

/// Result budget of a free-text search
pub const SEARCH_HITS: usize = 100;

/// Parameters of a personalized search
#[derive(Debug, Default, Clone)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub user_id: Option<&'a str>,
    /// Raw JSON preference list overriding the stored preferences
    pub preference_override: Option<&'a str>,
}

/// Runs a free-text search ranked by the resolved preference set
///
/// The query length is checked before anything else touches the engine.
pub async fn personalized_search(
    store: &Store,
    query_builder: &QueryBuilder,
    engine: &dyn SearchEngine,
    request: SearchRequest<'_>,
) -> AppResult<SearchResultSet> {
    validate_query_length(request.query)?;

    let preferences = resolve_preferences(store, &request).await?;
    let url = query_builder.build(request.query, &preferences, SEARCH_HITS);

    engine.execute(url).await
}

/// An override that decodes wins, `null` meaning none; otherwise the stored
/// set of the user, if any
///
/// Override entries are taken as-is. Unknown types or states are left for
/// the query builder to drop.
async fn resolve_preferences(
    store: &Store,
    request: &SearchRequest<'_>,
) -> AppResult<Vec<RawPreference>> {
    if let Some(raw) = request.preference_override.filter(|raw| !raw.is_empty()) {
        match serde_json::from_str::<Option<Vec<RawPreference>>>(raw) {
            Ok(preferences) => return Ok(preferences.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to decode override preferences");
            }
        }
    }

    match request.user_id.filter(|id| !id.is_empty()) {
        Some(user_id) => {
            let stored = store.preferences_for(user_id).await?;
            Ok(stored.into_iter().map(RawPreference::from).collect())
        }
        None => Ok(Vec::new()),
    }
}
