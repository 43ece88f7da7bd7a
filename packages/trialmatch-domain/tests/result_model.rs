use time::macros::datetime;
use trialmatch_domain::{MatchResult, TrialVerdict};

#[test]
fn match_result_serializes_with_stable_field_names() {
	let result = MatchResult {
		patient_id: "p-1".to_string(),
		generated_at: datetime!(2026-01-02 03:04:05 UTC),
		eligible_trials: vec![TrialVerdict {
			trial_id: "NCT0001".to_string(),
			trial_name: "Study A".to_string(),
			eligibility_reasons: vec!["Reason A".to_string()],
		}],
	};
	let json = serde_json::to_value(&result).expect("serialize failed");

	assert_eq!(json["patient_id"], "p-1");
	assert_eq!(json["generated_at"], "2026-01-02T03:04:05Z");
	assert_eq!(json["eligible_trials"][0]["trial_id"], "NCT0001");
	assert_eq!(json["eligible_trials"][0]["trial_name"], "Study A");
	assert_eq!(json["eligible_trials"][0]["eligibility_reasons"][0], "Reason A");
}

#[test]
fn match_result_round_trips() {
	let result = MatchResult {
		patient_id: "p-2".to_string(),
		generated_at: datetime!(2026-03-04 00:00:00 UTC),
		eligible_trials: Vec::new(),
	};
	let json = serde_json::to_string(&result).expect("serialize failed");
	let parsed: MatchResult = serde_json::from_str(&json).expect("deserialize failed");

	assert_eq!(parsed.patient_id, "p-2");
	assert!(parsed.eligible_trials.is_empty());
}
