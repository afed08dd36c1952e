pub mod escape;
pub mod queries;
pub mod select;

mod error;

pub use error::{Error, Result};
pub use queries::{
	MovieFilter, ask_probe_query, entity_label_query, entity_search_query, filter_movies_query,
	movie_details_query, similar_movies_query,
};
pub use select::SelectQuery;
