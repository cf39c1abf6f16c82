use std::collections::HashSet;

use crate::{
    db::Store,
    error::AppResult,
    models::{SearchHit, SearchResultSet},
    services::{
        query_builder::{QueryBuilder, WILDCARD_QUERY},
        search_engine::SearchEngine,
    },
};

/// Number of recommendations returned to the client
pub const RECOMMENDATION_COUNT: usize = 5;

/// Generates personalized recommendations the user has not watched yet
///
/// Asks the engine for `watched + RECOMMENDATION_COUNT` preference-weighted
/// hits so that enough fresh candidates remain even if every watched film
/// ranks at the top. The reported total is the size of the filtered list.
pub async fn recommend(
    store: &Store,
    query_builder: &QueryBuilder,
    engine: &dyn SearchEngine,
    user_id: &str,
) -> AppResult<SearchResultSet> {
    store.require_user(user_id).await?;

    let preferences = store.preferences_for(user_id).await?;
    let watched = store.watched_film_ids(user_id).await?;

    let url = query_builder.build(
        WILDCARD_QUERY,
        &preferences,
        watched.len() + RECOMMENDATION_COUNT,
    );
    let upstream = engine.execute(url).await?;
    let upstream_count = upstream.hits().len();

    let hits = filter_unwatched(upstream.root.children, &watched, RECOMMENDATION_COUNT);

    tracing::info!(
        user_id = %user_id,
        watched = watched.len(),
        upstream_hits = upstream_count,
        recommended = hits.len(),
        "Recommendations generated"
    );

    Ok(SearchResultSet::from_hits(hits))
}

/// Keeps hits whose film id is not in `watched`, in upstream order, up to `limit`
///
/// Hits whose id cannot be parsed have no film id and are never treated as
/// watched.
pub fn filter_unwatched(
    hits: Vec<SearchHit>,
    watched: &HashSet<String>,
    limit: usize,
) -> Vec<SearchHit> {
    hits.into_iter()
        .filter(|hit| {
            hit.document_id()
                .map_or(true, |id| !watched.contains(&id.local_id))
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{Disposition, Preference, PreferenceType, User, WatchHistoryEntry},
        services::search_engine::MockSearchEngine,
    };
    use std::collections::HashMap;

    fn hit(film_id: &str, relevance: f64) -> SearchHit {
        SearchHit {
            id: format!("id:films:film::{}", film_id),
            relevance,
            ..Default::default()
        }
    }

    fn hits(film_ids: &[&str]) -> Vec<SearchHit> {
        film_ids
            .iter()
            .enumerate()
            .map(|(i, id)| hit(id, 100.0 - i as f64))
            .collect()
    }

    fn watched(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn local_ids(hits: &[SearchHit]) -> Vec<String> {
        hits.iter()
            .map(|h| h.document_id().unwrap().local_id)
            .collect()
    }

    #[test]
    fn test_filter_drops_watched_and_truncates() {
        let upstream = hits(&[
            "film-1", "film-2", "film-3", "film-4", "film-5", "film-6", "film-7",
        ]);

        let result = filter_unwatched(upstream, &watched(&["film-1", "film-3"]), 5);

        assert_eq!(
            local_ids(&result),
            vec!["film-2", "film-4", "film-5", "film-6", "film-7"]
        );
    }

    #[test]
    fn test_filter_preserves_upstream_order() {
        let upstream = vec![hit("b", 0.2), hit("a", 0.9), hit("c", 0.5)];
        let result = filter_unwatched(upstream, &HashSet::new(), 5);
        assert_eq!(local_ids(&result), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_filter_keeps_unparseable_ids() {
        let upstream = vec![
            SearchHit {
                id: "film-1".to_string(),
                ..Default::default()
            },
            hit("film-1", 1.0),
        ];
        let result = filter_unwatched(upstream, &watched(&["film-1"]), 5);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "film-1");
    }

    #[test]
    fn test_filter_matches_local_id_under_any_prefix() {
        let upstream = vec![
            SearchHit {
                id: "films::film-1".to_string(),
                ..Default::default()
            },
            hit("film-2", 1.0),
        ];
        let result = filter_unwatched(upstream, &watched(&["film-1"]), 5);
        assert_eq!(local_ids(&result), vec!["film-2"]);
    }

    #[test]
    fn test_filter_fewer_candidates_than_limit() {
        let result = filter_unwatched(hits(&["1", "2"]), &watched(&["2"]), 5);
        assert_eq!(local_ids(&result), vec!["1"]);
    }

    async fn seeded_store() -> Store {
        let store = Store::in_memory().await.unwrap();
        store
            .insert_user(&User {
                id: "1".to_string(),
                name: "TestUser".to_string(),
            })
            .await
            .unwrap();
        store
            .replace_preferences(
                "1",
                &[Preference::new(
                    PreferenceType::Genre,
                    "Action",
                    Disposition::Like,
                )],
            )
            .await
            .unwrap();
        for film_id in ["film-1", "film-3"] {
            store
                .add_history(
                    "1",
                    &WatchHistoryEntry {
                        film_id: film_id.to_string(),
                        film_title: "Watched".to_string(),
                        film_genre: "Action".to_string(),
                        film_year: 2020,
                        film_tags: vec![],
                        user_rating: 4,
                    },
                )
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_recommend_requests_extra_hits_and_filters() {
        let store = seeded_store().await;
        let builder = QueryBuilder::new("http://vespa.test:8080").unwrap();

        let mut engine = MockSearchEngine::new();
        engine
            .expect_execute()
            .withf(|url| {
                let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
                params["hits"] == "7"
                    && params["yql"] == "select * from film where true"
                    && params["ranking.profile"] == "personalized"
                    && params["input.query(genre_boost)"] == "{{genre:Action}:1}"
                    && !params.contains_key("query")
            })
            .times(1)
            .returning(|_| {
                let mut upstream = SearchResultSet::from_hits(hits(&[
                    "film-1", "film-2", "film-3", "film-4", "film-5", "film-6", "film-7",
                ]));
                upstream.root.fields.total_count = 240;
                Ok(upstream)
            });

        let result = recommend(&store, &builder, &engine, "1").await.unwrap();

        assert_eq!(result.hits().len(), 5);
        assert_eq!(result.total_count(), 5);
        let ids = local_ids(result.hits());
        assert!(!ids.contains(&"film-1".to_string()));
        assert!(!ids.contains(&"film-3".to_string()));
    }

    #[tokio::test]
    async fn test_recommend_unknown_user_is_not_found() {
        let store = Store::in_memory().await.unwrap();
        let builder = QueryBuilder::new("http://vespa.test:8080").unwrap();
        let mut engine = MockSearchEngine::new();
        engine.expect_execute().never();

        let err = recommend(&store, &builder, &engine, "404").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recommend_propagates_upstream_failure() {
        let store = seeded_store().await;
        let builder = QueryBuilder::new("http://vespa.test:8080").unwrap();
        let mut engine = MockSearchEngine::new();
        engine
            .expect_execute()
            .times(1)
            .returning(|_| Err(AppError::UpstreamStatus { status: 500 }));

        let err = recommend(&store, &builder, &engine, "1").await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamStatus { status: 500 }));
    }
}
