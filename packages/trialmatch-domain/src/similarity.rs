use trialmatch_config::Matching;

/// Cosine similarity of two embeddings. Returns 0.0 when either vector has
/// zero magnitude, so degenerate embeddings rank last instead of poisoning
/// the sort with NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	let mut dot = 0.0_f32;
	let mut norm_a = 0.0_f32;
	let mut norm_b = 0.0_f32;

	for (x, y) in a.iter().zip(b) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Combined eligibility score for one patient/trial pair: proximity to what
/// the trial wants minus proximity to what it excludes. Unit weights give a
/// range of [-2, 2]; no clamping.
pub fn eligibility_score(
	cfg: &Matching,
	patient: &[f32],
	inclusion: &[f32],
	exclusion: &[f32],
) -> f32 {
	cfg.inclusion_weight * cosine_similarity(patient, inclusion)
		- cfg.exclusion_weight * cosine_similarity(patient, exclusion)
}
