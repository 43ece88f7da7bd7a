use crate::{Error, MatchService, Result};
use trialmatch_domain::PatientProfile;
use trialmatch_storage::VectorRecord;

/// A patient's clinical narrative with its embedding, either replayed from
/// the patient store or freshly produced.
#[derive(Clone, Debug)]
pub struct PatientVector {
	pub narrative: String,
	pub embedding: Vec<f32>,
}

pub(crate) enum PatientResolution {
	Ready(PatientVector),
	Aborted { reason: String },
}

impl MatchService {
	/// Resolve the patient vector. The patient store is a write-once cache:
	/// a hit replays the stored narrative and embedding without touching
	/// the profile source, summarizer, or embedding model. On a miss, any
	/// summarization or embedding failure aborts this patient without
	/// leaving a trace, so a retry starts from scratch.
	pub(crate) async fn resolve_patient(&self, patient_id: &str) -> Result<PatientResolution> {
		let store = &self.stores.patients;

		if store.exists(patient_id).await? {
			let record = store.fetch(patient_id).await?;

			tracing::info!(patient = %patient_id, "Patient vector cache hit.");

			return Ok(PatientResolution::Ready(PatientVector {
				narrative: record.document,
				embedding: record.embedding,
			}));
		}

		let profile = match self.profiles.profile(patient_id).await {
			Ok(profile) => profile,
			Err(err) => {
				tracing::warn!(
					patient = %patient_id,
					error = %err,
					"Profile fetch failed; aborting patient."
				);

				return Ok(PatientResolution::Aborted { reason: err.to_string() });
			},
		};
		let prompt = match summarization_prompt(&profile) {
			Ok(prompt) => prompt,
			Err(err) => {
				tracing::warn!(
					patient = %patient_id,
					error = %err,
					"Profile could not be rendered; aborting patient."
				);

				return Ok(PatientResolution::Aborted { reason: err.to_string() });
			},
		};
		let narrative = match self
			.providers
			.completion
			.complete(&self.cfg.providers.summarizer, &prompt)
			.await
		{
			Ok(text) => text,
			Err(err) => {
				tracing::warn!(
					patient = %patient_id,
					error = %err,
					rate_limited = err.is_rate_limited(),
					"Summarization failed; aborting patient."
				);

				return Ok(PatientResolution::Aborted { reason: err.to_string() });
			},
		};
		let embedding = match self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, &[narrative.clone()])
			.await
		{
			Ok(mut vectors) if !vectors.is_empty() => vectors.remove(0),
			Ok(_) => {
				tracing::warn!(
					patient = %patient_id,
					"Embedding provider returned no vectors; aborting patient."
				);

				return Ok(PatientResolution::Aborted {
					reason: "Embedding provider returned no vectors.".to_string(),
				});
			},
			Err(err) => {
				tracing::warn!(
					patient = %patient_id,
					error = %err,
					rate_limited = err.is_rate_limited(),
					"Embedding failed; aborting patient."
				);

				return Ok(PatientResolution::Aborted { reason: err.to_string() });
			},
		};

		store
			.upsert(&VectorRecord {
				id: patient_id.to_string(),
				embedding: embedding.clone(),
				document: narrative.clone(),
				title: None,
			})
			.await
			.map_err(Error::Store)?;

		tracing::info!(patient = %patient_id, "Patient narrative embedded and cached.");

		Ok(PatientResolution::Ready(PatientVector { narrative, embedding }))
	}
}

/// The summarizer sees the structured record as JSON and must answer with
/// plain prose; the narrative becomes the patient's searchable document.
fn summarization_prompt(profile: &PatientProfile) -> serde_json::Result<String> {
	let record = serde_json::to_string_pretty(profile)?;

	Ok(format!(
		"You are an expert medical data analyst. You are given one patient's \
structured clinical record as JSON. Write a detailed yet concise summary of \
all clinically relevant information: conditions, medications, allergies, \
immunizations, procedures, observations, age, and gender. Include important \
dates alongside medications, procedures, and immunizations. Respond with \
plain prose only; do not repeat the patient's identifier, do not include \
code, and do not describe the JSON structure.\n\nPatient record:\n{record}"
	))
}
