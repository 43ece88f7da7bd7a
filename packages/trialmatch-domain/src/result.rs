use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One trial the adjudicator accepted for a patient.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TrialVerdict {
	pub trial_id: String,
	pub trial_name: String,
	pub eligibility_reasons: Vec<String>,
}

/// The per-patient match document handed to the result sink. Rewritten
/// wholesale on rerun; never appended to.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MatchResult {
	pub patient_id: String,
	#[serde(with = "time::serde::rfc3339")]
	pub generated_at: OffsetDateTime,
	pub eligible_trials: Vec<TrialVerdict>,
}
