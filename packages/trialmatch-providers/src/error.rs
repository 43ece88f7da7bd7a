pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider {provider} rejected the request with a rate limit.")]
	RateLimited { provider: String },
	#[error("Request to provider {provider} failed.")]
	Http { provider: String, source: reqwest::Error },
	#[error("Provider {provider} returned a malformed response: {message}")]
	Malformed { provider: String, message: String },
	#[error("Invalid configuration for provider {provider}: {message}")]
	Config { provider: String, message: String },
}
impl Error {
	pub fn is_rate_limited(&self) -> bool {
		matches!(self, Self::RateLimited { .. })
	}
}
