pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Request to the graph store timed out.")]
	Timeout(#[source] reqwest::Error),
	#[error("Failed to reach the graph store.")]
	Transport(#[source] reqwest::Error),
	#[error("The graph store rejected the query: {body}")]
	QueryRejected { body: String },
	#[error("The graph store returned HTTP {status}.")]
	Http { status: u16 },
	#[error("Malformed response from the graph store: {message}")]
	MalformedResponse { message: String },
}
impl Error {
	/// Only connection-level failures are worth retrying; a rejected query
	/// or an HTTP error will not improve on a second attempt.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Timeout(_) | Self::Transport(_))
	}
}
