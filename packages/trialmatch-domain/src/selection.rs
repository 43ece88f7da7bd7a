use std::cmp::Ordering;

use trialmatch_config::Matching;

/// Ephemeral ranking tuple produced while shortlisting; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateScore {
	pub trial_id: String,
	pub score: f32,
}

/// Threshold, rank, and cap the scored candidates into the shortlist sent
/// to adjudication.
///
/// The cap is a three-way bucket over the survivor count `n`, not a plain
/// `min(n, cap)`:
///   - `n > hard_cap`            -> first `hard_cap`
///   - `n < soft_cap`            -> all `n`
///   - `soft_cap <= n <= hard_cap` -> first `soft_cap`
/// The list only exceeds `soft_cap` when the unrestricted survivor set
/// already exceeds `hard_cap`.
pub fn select_candidates(cfg: &Matching, mut candidates: Vec<CandidateScore>) -> Vec<CandidateScore> {
	// Strict inequality: a candidate exactly at the threshold is excluded.
	candidates.retain(|candidate| candidate.score > cfg.score_threshold);
	candidates.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(Ordering::Equal)
			.then_with(|| a.trial_id.cmp(&b.trial_id))
	});

	let n = candidates.len();
	let keep = if n > cfg.shortlist_hard_cap {
		cfg.shortlist_hard_cap
	} else if n < cfg.shortlist_soft_cap {
		n
	} else {
		cfg.shortlist_soft_cap
	};

	candidates.truncate(keep);

	candidates
}
