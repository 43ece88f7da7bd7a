use time::OffsetDateTime;

use crate::{Error, MatchService, Result, summarize::PatientResolution};
use trialmatch_domain::MatchResult;

/// Terminal state of one patient's matching run.
#[derive(Clone, Debug)]
pub enum MatchOutcome {
	Persisted { result: MatchResult },
	Aborted { patient_id: String, reason: String },
}

impl MatchService {
	/// Run the full per-patient pipeline: resolve the patient vector,
	/// shortlist, adjudicate, persist. Summarization failures surface as an
	/// `Aborted` outcome rather than an error; everything this returns as
	/// `Err` is contained to the patient by the batch driver, except the
	/// consistency fault.
	pub async fn match_patient(&self, patient_id: &str) -> Result<MatchOutcome> {
		let patient = match self.resolve_patient(patient_id).await? {
			PatientResolution::Ready(patient) => patient,
			PatientResolution::Aborted { reason } => {
				return Ok(MatchOutcome::Aborted { patient_id: patient_id.to_string(), reason });
			},
		};
		let shortlist = self.shortlist(&patient.embedding).await?;

		tracing::info!(
			patient = %patient_id,
			shortlisted = shortlist.len(),
			"Shortlisted candidate trials."
		);

		let eligible_trials = self.adjudicate(&patient.narrative, &shortlist).await?;

		tracing::info!(
			patient = %patient_id,
			eligible = eligible_trials.len(),
			"Adjudication complete."
		);

		let result = MatchResult {
			patient_id: patient_id.to_string(),
			generated_at: OffsetDateTime::now_utc(),
			eligible_trials,
		};

		self.sink
			.write(&result)
			.await
			.map_err(|err| Error::Sink { patient_id: patient_id.to_string(), source: err })?;

		tracing::info!(patient = %patient_id, "Match result persisted.");

		Ok(MatchOutcome::Persisted { result })
	}
}
