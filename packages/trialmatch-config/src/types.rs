use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub matching: Matching,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
	pub profiles: Profiles,
	pub results: Results,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub inclusion_collection: String,
	pub exclusion_collection: String,
	pub patient_collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Profiles {
	/// Path to the SQLite database holding the patient source data set.
	pub database: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Results {
	pub dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub summarizer: LlmProviderConfig,
	pub adjudicator: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Engine tunables. The defaults mirror the constants the matching
/// algorithm was built with; whether they are tuned or placeholder is an
/// open question, so they stay configurable.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Matching {
	pub top_k: u32,
	pub score_threshold: f32,
	pub inclusion_weight: f32,
	pub exclusion_weight: f32,
	pub accept_probability: f32,
	pub shortlist_hard_cap: usize,
	pub shortlist_soft_cap: usize,
	pub max_patients: usize,
}
impl Default for Matching {
	fn default() -> Self {
		Self {
			top_k: 100,
			score_threshold: 0.1,
			inclusion_weight: 1.0,
			exclusion_weight: 1.0,
			accept_probability: 0.5,
			shortlist_hard_cap: 15,
			shortlist_soft_cap: 10,
			max_patients: 10,
		}
	}
}
