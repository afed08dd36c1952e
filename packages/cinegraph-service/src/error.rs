pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Caller-facing error kinds. An empty result list always means a search
/// succeeded with no matches; every failure surfaces as one of these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Upstream error: {message}")]
	Upstream { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
}
impl From<cinegraph_sparql::Error> for Error {
	fn from(err: cinegraph_sparql::Error) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}

impl From<cinegraph_store::Error> for Error {
	fn from(err: cinegraph_store::Error) -> Self {
		Self::Upstream { message: err.to_string() }
	}
}

impl From<cinegraph_providers::Error> for Error {
	fn from(err: cinegraph_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
