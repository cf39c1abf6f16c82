pub mod query_builder;
pub mod recommendations;
pub mod search;
pub mod search_engine;

pub use query_builder::QueryBuilder;
pub use search_engine::{SearchEngine, VespaClient};
