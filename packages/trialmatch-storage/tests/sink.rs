use std::{env, fs, path::PathBuf, process};

use time::macros::datetime;

use trialmatch_domain::{MatchResult, TrialVerdict};
use trialmatch_storage::{ResultSink, sink::JsonResultSink};

fn temp_results_dir(label: &str) -> PathBuf {
	let mut dir = env::temp_dir();

	dir.push(format!("trialmatch_sink_test_{label}_{}", process::id()));

	dir
}

fn sample_result(eligible: Vec<TrialVerdict>) -> MatchResult {
	MatchResult {
		patient_id: "p-1".to_string(),
		generated_at: datetime!(2026-01-02 03:04:05 UTC),
		eligible_trials: eligible,
	}
}

#[tokio::test]
async fn writes_one_indented_document_per_patient() {
	let dir = temp_results_dir("write");
	let sink = JsonResultSink::create(&dir).expect("Failed to create sink.");
	let result = sample_result(vec![TrialVerdict {
		trial_id: "NCT0001".to_string(),
		trial_name: "Study A".to_string(),
		eligibility_reasons: vec!["Reason A".to_string()],
	}]);

	sink.write(&result).await.expect("Failed to write result.");

	let raw = fs::read_to_string(sink.path_for("p-1")).expect("Failed to read document.");

	assert!(raw.contains("\n  \"patient_id\": \"p-1\""), "Expected 2-space indentation: {raw}");
	assert!(raw.contains("NCT0001"));

	let parsed: MatchResult = serde_json::from_str(&raw).expect("Document must parse back.");

	assert_eq!(parsed.eligible_trials.len(), 1);

	fs::remove_dir_all(&dir).expect("Failed to clean up.");
}

#[tokio::test]
async fn rerun_overwrites_the_previous_document() {
	let dir = temp_results_dir("overwrite");
	let sink = JsonResultSink::create(&dir).expect("Failed to create sink.");

	sink.write(&sample_result(vec![TrialVerdict {
		trial_id: "NCT0001".to_string(),
		trial_name: "Study A".to_string(),
		eligibility_reasons: Vec::new(),
	}]))
	.await
	.expect("Failed to write first result.");
	sink.write(&sample_result(Vec::new())).await.expect("Failed to write second result.");

	let raw = fs::read_to_string(sink.path_for("p-1")).expect("Failed to read document.");
	let parsed: MatchResult = serde_json::from_str(&raw).expect("Document must parse back.");

	assert!(parsed.eligible_trials.is_empty(), "Second run must replace the first document.");

	fs::remove_dir_all(&dir).expect("Failed to clean up.");
}
