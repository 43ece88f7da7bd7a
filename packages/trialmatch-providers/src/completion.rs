use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use trialmatch_config::LlmProviderConfig;

/// Send one prompt as a single user message and return the raw completion
/// text. No system preamble; the prompt carries its own instructions.
pub async fn complete(cfg: &LlmProviderConfig, prompt: &str) -> Result<String> {
	let provider = cfg.provider_id.as_str();
	let client = Client::builder()
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.build()
		.map_err(|err| Error::Http { provider: provider.to_string(), source: err })?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": [{ "role": "user", "content": prompt }],
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

	parse_completion_content(provider, json)
}

fn parse_completion_content(provider: &str, json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::to_string)
		.ok_or_else(|| Error::Malformed {
			provider: provider.to_string(),
			message: "Response is missing choices[0].message.content.".to_string(),
		})
}
