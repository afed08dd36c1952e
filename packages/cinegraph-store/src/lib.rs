pub mod client;
pub mod results;

mod error;

pub use client::SparqlStore;
pub use error::{Error, Result};
pub use results::BindingRow;
