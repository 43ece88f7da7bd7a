use crate::{Error, MatchService, Result};
use trialmatch_domain::{CandidateScore, TrialVerdict, parse_reply};

impl MatchService {
	/// Ask the LLM to verify each shortlisted trial individually, in
	/// shortlist order. Replies that do not lead with a numeric probability
	/// and replies below the acceptance bar drop the candidate silently;
	/// transport failures drop the candidate with a warning. Both are
	/// contained to the candidate, never the patient.
	pub(crate) async fn adjudicate(
		&self,
		narrative: &str,
		shortlist: &[CandidateScore],
	) -> Result<Vec<TrialVerdict>> {
		let mut verdicts = Vec::new();

		for candidate in shortlist {
			let inclusion =
				self.stores.inclusion.fetch_document(&candidate.trial_id).await?;
			let exclusion = match self.stores.exclusion.fetch_document(&candidate.trial_id).await
			{
				Ok(document) => document,
				Err(err) if err.is_not_found() => {
					return Err(Error::Consistency { trial_id: candidate.trial_id.clone() });
				},
				Err(err) => return Err(Error::Store(err)),
			};
			let prompt = adjudication_prompt(narrative, &inclusion.text, &exclusion.text);
			let reply = match self
				.providers
				.completion
				.complete(&self.cfg.providers.adjudicator, &prompt)
				.await
			{
				Ok(text) => text,
				Err(err) => {
					tracing::warn!(
						trial = %candidate.trial_id,
						error = %err,
						"Adjudication call failed; dropping candidate."
					);

					continue;
				},
			};
			let Some(verdict) = parse_reply(&reply) else {
				tracing::debug!(
					trial = %candidate.trial_id,
					"Adjudication reply did not lead with a probability; dropping candidate."
				);

				continue;
			};

			if verdict.probability < self.cfg.matching.accept_probability {
				tracing::debug!(
					trial = %candidate.trial_id,
					probability = verdict.probability,
					"Candidate rejected by adjudication."
				);

				continue;
			}

			let trial_name =
				inclusion.title.clone().unwrap_or_else(|| candidate.trial_id.clone());

			tracing::info!(
				trial = %candidate.trial_id,
				probability = verdict.probability,
				"Candidate accepted by adjudication."
			);
			verdicts.push(TrialVerdict {
				trial_id: candidate.trial_id.clone(),
				trial_name,
				eligibility_reasons: verdict.reasons,
			});
		}

		Ok(verdicts)
	}
}

fn adjudication_prompt(narrative: &str, inclusion: &str, exclusion: &str) -> String {
	format!(
		"You are verifying whether one patient is eligible for one clinical \
trial.\n\nPatient summary:\n{narrative}\n\nTrial inclusion criteria:\n\
{inclusion}\n\nTrial exclusion criteria:\n{exclusion}\n\nRespond with a \
single eligibility probability between 0 and 1 on the first line, alone. \
Then give at most five short sentences explaining the decision. If the \
patient satisfies any exclusion criterion, the probability must be 0."
	)
}
