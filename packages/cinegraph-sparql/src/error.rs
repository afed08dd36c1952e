pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Filter for {attribute} contains an empty value.")]
	EmptyFilterValue { attribute: &'static str },
	#[error("Not an absolute IRI: {value}")]
	InvalidIri { value: String },
	#[error("Invalid year range: {start} > {end}.")]
	InvalidYearRange { start: i32, end: i32 },
	#[error("At least one movie URI is required.")]
	NoUris,
}
