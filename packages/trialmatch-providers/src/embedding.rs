use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use trialmatch_config::EmbeddingProviderConfig;

pub async fn embed(cfg: &EmbeddingProviderConfig, texts: &[String]) -> Result<Vec<Vec<f32>>> {
	let provider = cfg.provider_id.as_str();
	let client = Client::builder()
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.build()
		.map_err(|err| Error::Http { provider: provider.to_string(), source: err })?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(provider, &cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await
		.map_err(|err| Error::Http { provider: provider.to_string(), source: err })?;
	let res = crate::check_status(provider, res)?;
	let json: Value = res
		.json()
		.await
		.map_err(|err| Error::Http { provider: provider.to_string(), source: err })?;

	parse_embedding_response(provider, json, cfg.dimensions)
}

fn parse_embedding_response(
	provider: &str,
	json: Value,
	dimensions: u32,
) -> Result<Vec<Vec<f32>>> {
	let malformed = |message: String| Error::Malformed { provider: provider.to_string(), message };
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| malformed("Missing data array.".to_string()))?;

	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.and_then(|v| v.as_array())
			.ok_or_else(|| malformed("Item missing embedding array.".to_string()))?;
		let mut vec = Vec::with_capacity(embedding.len());

		for value in embedding {
			let number = value
				.as_f64()
				.ok_or_else(|| malformed("Embedding value must be numeric.".to_string()))?;

			vec.push(number as f32);
		}

		if vec.len() != dimensions as usize {
			return Err(malformed(format!(
				"Embedding has {} dimensions, expected {dimensions}.",
				vec.len()
			)));
		}

		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}
