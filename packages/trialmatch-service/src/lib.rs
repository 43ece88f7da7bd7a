pub mod adjudicate;
pub mod batch;
pub mod matching;
pub mod shortlist;
pub mod summarize;

mod error;

pub use batch::BatchSummary;
pub use error::{Error, Result};
pub use matching::MatchOutcome;

use std::{future::Future, pin::Pin, sync::Arc};

use trialmatch_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use trialmatch_providers::{completion, embedding};
use trialmatch_storage::{ProfileSource, ResultSink, VectorStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, trialmatch_providers::Result<Vec<Vec<f32>>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, trialmatch_providers::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub completion: Arc<dyn CompletionProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		completion: Arc<dyn CompletionProvider>,
	) -> Self {
		Self { embedding, completion }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), completion: provider }
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, trialmatch_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, trialmatch_providers::Result<String>> {
		Box::pin(completion::complete(cfg, prompt))
	}
}

/// The three vector stores the engine reads and writes.
#[derive(Clone)]
pub struct TrialStores {
	pub inclusion: Arc<dyn VectorStore>,
	pub exclusion: Arc<dyn VectorStore>,
	pub patients: Arc<dyn VectorStore>,
}

/// The matching engine. All dependencies are explicit and constructed once
/// at process start; the service holds no hidden global state.
pub struct MatchService {
	pub cfg: Config,
	pub stores: TrialStores,
	pub profiles: Arc<dyn ProfileSource>,
	pub sink: Arc<dyn ResultSink>,
	pub providers: Providers,
}
impl MatchService {
	pub fn new(
		cfg: Config,
		stores: TrialStores,
		profiles: Arc<dyn ProfileSource>,
		sink: Arc<dyn ResultSink>,
	) -> Self {
		Self { cfg, stores, profiles, sink, providers: Providers::default() }
	}

	pub fn with_providers(
		cfg: Config,
		stores: TrialStores,
		profiles: Arc<dyn ProfileSource>,
		sink: Arc<dyn ResultSink>,
		providers: Providers,
	) -> Self {
		Self { cfg, stores, profiles, sink, providers }
	}
}
