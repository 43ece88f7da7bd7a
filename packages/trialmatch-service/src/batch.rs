use crate::{MatchOutcome, MatchService, Result};

/// Tally of one batch run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchSummary {
	pub persisted: usize,
	pub aborted: usize,
	pub failed: usize,
}

impl MatchService {
	/// Match a bounded prefix of all known patients, strictly one at a
	/// time: the LLM API enforces a global rate limit, so seriality is a
	/// correctness requirement here, not an optimization oversight. The
	/// `max_patients` cap bounds total external-quota exposure. Only the
	/// consistency fault stops the loop; every other failure is logged and
	/// contained to its patient.
	pub async fn run_batch(&self) -> Result<BatchSummary> {
		let patient_ids = self.profiles.patient_ids().await?;
		let cap = self.cfg.matching.max_patients;
		let mut summary = BatchSummary::default();

		tracing::info!(
			patients = patient_ids.len().min(cap),
			known = patient_ids.len(),
			"Starting match batch."
		);

		for patient_id in patient_ids.iter().take(cap) {
			match self.match_patient(patient_id).await {
				Ok(MatchOutcome::Persisted { .. }) => summary.persisted += 1,
				Ok(MatchOutcome::Aborted { reason, .. }) => {
					summary.aborted += 1;

					tracing::warn!(patient = %patient_id, %reason, "Patient aborted.");
				},
				Err(err) if err.halts_batch() => return Err(err),
				Err(err) => {
					summary.failed += 1;

					tracing::error!(patient = %patient_id, error = %err, "Patient match failed.");
				},
			}
		}

		tracing::info!(
			persisted = summary.persisted,
			aborted = summary.aborted,
			failed = summary.failed,
			"Match batch finished."
		);

		Ok(summary)
	}
}
