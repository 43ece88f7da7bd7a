mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Matching, Profiles, Providers, Qdrant,
	Results, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	let collections = [
		("storage.qdrant.inclusion_collection", &cfg.storage.qdrant.inclusion_collection),
		("storage.qdrant.exclusion_collection", &cfg.storage.qdrant.exclusion_collection),
		("storage.qdrant.patient_collection", &cfg.storage.qdrant.patient_collection),
	];

	for (label, name) in &collections {
		if name.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}
	for (index, (label, name)) in collections.iter().enumerate() {
		for (other_label, other_name) in collections.iter().skip(index + 1) {
			if name == other_name {
				return Err(Error::Validation {
					message: format!("{label} and {other_label} must name distinct collections."),
				});
			}
		}
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("summarizer", &cfg.providers.summarizer.api_key),
		("adjudicator", &cfg.providers.adjudicator.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}
	for (label, max_tokens) in [
		("providers.summarizer", cfg.providers.summarizer.max_tokens),
		("providers.adjudicator", cfg.providers.adjudicator.max_tokens),
	] {
		if max_tokens == 0 {
			return Err(Error::Validation {
				message: format!("{label}.max_tokens must be greater than zero."),
			});
		}
	}

	if cfg.matching.top_k == 0 {
		return Err(Error::Validation {
			message: "matching.top_k must be greater than zero.".to_string(),
		});
	}
	if !cfg.matching.score_threshold.is_finite() {
		return Err(Error::Validation {
			message: "matching.score_threshold must be a finite number.".to_string(),
		});
	}
	for (label, weight) in [
		("matching.inclusion_weight", cfg.matching.inclusion_weight),
		("matching.exclusion_weight", cfg.matching.exclusion_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number."),
			});
		}
	}
	if !(0.0..=1.0).contains(&cfg.matching.accept_probability) {
		return Err(Error::Validation {
			message: "matching.accept_probability must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.matching.shortlist_soft_cap == 0 {
		return Err(Error::Validation {
			message: "matching.shortlist_soft_cap must be greater than zero.".to_string(),
		});
	}
	if cfg.matching.shortlist_soft_cap > cfg.matching.shortlist_hard_cap {
		return Err(Error::Validation {
			message: "matching.shortlist_soft_cap must not exceed matching.shortlist_hard_cap."
				.to_string(),
		});
	}
	if cfg.matching.max_patients == 0 {
		return Err(Error::Validation {
			message: "matching.max_patients must be greater than zero.".to_string(),
		});
	}

	Ok(())
}
