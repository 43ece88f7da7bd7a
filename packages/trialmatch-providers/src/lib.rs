pub mod completion;
pub mod embedding;

mod error;

pub use error::{Error, Result};

use reqwest::{
	StatusCode,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

pub(crate) fn auth_headers(
	provider: &str,
	api_key: &str,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	let bearer = format!("Bearer {api_key}").parse().map_err(|_| Error::Config {
		provider: provider.to_string(),
		message: "api_key is not a valid header value.".to_string(),
	})?;

	headers.insert(AUTHORIZATION, bearer);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::Config {
				provider: provider.to_string(),
				message: format!("Default header {key} must be a string."),
			});
		};
		let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| Error::Config {
			provider: provider.to_string(),
			message: format!("Default header name {key} is invalid."),
		})?;
		let parsed = raw.parse().map_err(|_| Error::Config {
			provider: provider.to_string(),
			message: format!("Default header {key} has an invalid value."),
		})?;

		headers.insert(name, parsed);
	}

	Ok(headers)
}

pub(crate) fn check_status(provider: &str, res: reqwest::Response) -> Result<reqwest::Response> {
	if res.status() == StatusCode::TOO_MANY_REQUESTS {
		return Err(Error::RateLimited { provider: provider.to_string() });
	}

	res.error_for_status()
		.map_err(|err| Error::Http { provider: provider.to_string(), source: err })
}
