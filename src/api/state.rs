use std::sync::Arc;

use crate::{
    db::Store,
    services::{QueryBuilder, SearchEngine},
};

/// Shared application state
///
/// Everything in here is cheap to clone and safe to share between requests;
/// the store serializes concurrent writers itself.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub query_builder: Arc<QueryBuilder>,
    pub search_engine: Arc<dyn SearchEngine>,
}

impl AppState {
    pub fn new(
        store: Store,
        query_builder: QueryBuilder,
        search_engine: Arc<dyn SearchEngine>,
    ) -> Self {
        Self {
            store,
            query_builder: Arc::new(query_builder),
            search_engine,
        }
    }
}
