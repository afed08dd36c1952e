use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Embeds one free-text plot description through the configured
/// OpenAI-compatible embeddings endpoint and returns its vector.
pub async fn embed_description(
	cfg: &cinegraph_config::EmbeddingProviderConfig,
	text: &str,
) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": [text],
		"dimensions": cfg.dimensions,
	});
	let response = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = response.error_for_status()?.json().await?;
	let vector = parse_single_embedding(&json)?;

	if vector.len() != cfg.dimensions as usize {
		return Err(Error::InvalidResponse {
			message: format!(
				"Embedding dimension mismatch: expected {}, got {}.",
				cfg.dimensions,
				vector.len()
			),
		});
	}

	Ok(vector)
}

fn parse_single_embedding(json: &Value) -> Result<Vec<f32>> {
	let data = json.get("data").and_then(Value::as_array).ok_or_else(|| {
		Error::InvalidResponse { message: "Embedding response is missing data array.".to_string() }
	})?;
	let first = data.first().ok_or_else(|| Error::InvalidResponse {
		message: "Embedding response data array is empty.".to_string(),
	})?;
	let embedding =
		first.get("embedding").and_then(Value::as_array).ok_or_else(|| Error::InvalidResponse {
			message: "Embedding item is missing the embedding array.".to_string(),
		})?;
	let mut vector = Vec::with_capacity(embedding.len());

	for value in embedding {
		let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
			message: "Embedding value must be numeric.".to_string(),
		})?;

		vector.push(number as f32);
	}

	Ok(vector)
}
