use crate::{Error, MatchService, Result};
use trialmatch_domain::{CandidateScore, eligibility_score, select_candidates};

impl MatchService {
	/// Query the inclusion store for the broad candidate set, pair every
	/// candidate with its exclusion embedding, score, and select. A missing
	/// exclusion entry breaks the pairing invariant and fails the batch;
	/// it is never skipped.
	pub(crate) async fn shortlist(&self, patient_embedding: &[f32]) -> Result<Vec<CandidateScore>> {
		let hits =
			self.stores.inclusion.query(patient_embedding, self.cfg.matching.top_k).await?;
		let mut scored = Vec::with_capacity(hits.len());

		for hit in hits {
			let exclusion = match self.stores.exclusion.fetch_embedding(&hit.id).await {
				Ok(embedding) => embedding,
				Err(err) if err.is_not_found() => {
					return Err(Error::Consistency { trial_id: hit.id });
				},
				Err(err) => return Err(Error::Store(err)),
			};
			let score = eligibility_score(
				&self.cfg.matching,
				patient_embedding,
				&hit.embedding,
				&exclusion,
			);

			scored.push(CandidateScore { trial_id: hit.id, score });
		}

		Ok(select_candidates(&self.cfg.matching, scored))
	}
}
