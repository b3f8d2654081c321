pub mod engine;
pub mod explain;

pub use engine::{query_feed, QueryResult};
pub use explain::explain;
