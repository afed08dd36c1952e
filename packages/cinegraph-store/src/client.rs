use std::time::Duration;

use reqwest::{Client, StatusCode, header::ACCEPT};
use serde_json::Value;

use crate::{
	Error, Result,
	results::{self, BindingRow},
};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const RETRY_BACKOFF: Duration = Duration::from_millis(250);
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Read-only SPARQL protocol client for the configured GraphDB repository.
/// Queries are POSTed form-encoded; transport failures are retried within
/// the configured budget, and exhaustion fails the whole request rather
/// than returning partial results.
pub struct SparqlStore {
	client: Client,
	endpoint: String,
	retry_attempts: u32,
}
impl SparqlStore {
	pub fn new(cfg: &cinegraph_config::GraphDb) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.build()
			.map_err(Error::Transport)?;

		Ok(Self {
			client,
			endpoint: cfg.endpoint.clone(),
			retry_attempts: cfg.retry_attempts,
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub async fn select(&self, query: &str) -> Result<Vec<BindingRow>> {
		let json = self.execute(query).await?;

		results::parse_select_response(&json)
	}

	pub async fn ask(&self, query: &str) -> Result<bool> {
		let json = self.execute(query).await?;

		json.get("boolean").and_then(Value::as_bool).ok_or_else(|| Error::MalformedResponse {
			message: "ASK response is missing the boolean field.".to_string(),
		})
	}

	async fn execute(&self, query: &str) -> Result<Value> {
		let mut attempt = 0_u32;

		loop {
			match self.execute_once(query).await {
				Ok(json) => return Ok(json),
				Err(err) if err.is_retryable() && attempt < self.retry_attempts => {
					attempt += 1;

					tracing::warn!(attempt, error = %err, "Graph store request failed, retrying.");
					tokio::time::sleep(RETRY_BACKOFF * attempt).await;
				},
				Err(err) => return Err(err),
			}
		}
	}

	async fn execute_once(&self, query: &str) -> Result<Value> {
		let response = self
			.client
			.post(&self.endpoint)
			.header(ACCEPT, SPARQL_RESULTS_JSON)
			.form(&[("query", query)])
			.send()
			.await
			.map_err(map_send_error)?;
		let status = response.status();

		if status == StatusCode::BAD_REQUEST {
			let body = response.text().await.unwrap_or_default();

			return Err(Error::QueryRejected { body: truncate_body(&body) });
		}
		if !status.is_success() {
			return Err(Error::Http { status: status.as_u16() });
		}

		response.json().await.map_err(|err| Error::MalformedResponse {
			message: format!("Response body is not JSON: {err}."),
		})
	}
}

fn map_send_error(err: reqwest::Error) -> Error {
	if err.is_timeout() { Error::Timeout(err) } else { Error::Transport(err) }
}

fn truncate_body(body: &str) -> String {
	let trimmed = body.trim();

	if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
		return trimmed.to_string();
	}

	trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
