use std::sync::Arc;

use trialmatch_service::{MatchOutcome, Providers};
use trialmatch_storage::VectorStore;
use trialmatch_testkit::MemoryProfiles;

use super::{Scripted, ScriptedCompletion, StubEmbedding, build_harness, criteria, patient_vector};

/// Three trials with eligibility scores 0.6 / 0.05 / 0.3 against the
/// default threshold 0.1: T2 never reaches adjudication, T1 is accepted at
/// probability 0.9, T3 parses but falls below the 0.5 acceptance bar, and
/// T4 (score 0.4) answers with prose instead of a number. Only T1 lands in
/// the persisted document.
#[tokio::test]
async fn end_to_end_match_keeps_only_accepted_trials() {
	let completion = ScriptedCompletion::new(vec![
		("Trial one wants adults", Scripted::Reply("0.9\nMeets every inclusion criterion.\nNo exclusion applies.".to_string())),
		("Trial three wants seniors", Scripted::Reply("0.2\nUnlikely to qualify.".to_string())),
		("Trial four wants athletes", Scripted::Reply("maybe\nHard to say.".to_string())),
	]);
	let providers = Providers::new(
		Arc::new(StubEmbedding { vector: vec![1.0, 0.0] }),
		Arc::new(completion),
	);
	let harness =
		build_harness(super::test_config(), Arc::new(MemoryProfiles::default()), providers);

	// Patient vector already cached; exclusion vectors orthogonal to the
	// patient so each score equals the inclusion cosine.
	harness
		.patients
		.upsert(&patient_vector("patient-1", vec![1.0, 0.0], "Adult with chronic sinusitis."))
		.await
		.expect("seed patient");

	for (id, title, cosine, document) in [
		("NCT0001", "Study One", 0.6_f32, "Trial one wants adults."),
		("NCT0002", "Study Two", 0.05, "Trial two wants infants."),
		("NCT0003", "Study Three", 0.3, "Trial three wants seniors."),
		("NCT0004", "Study Four", 0.4, "Trial four wants athletes."),
	] {
		let embedding = vec![cosine, (1.0 - cosine * cosine).sqrt()];

		harness
			.inclusion
			.upsert(&criteria(id, title, embedding, document))
			.await
			.expect("seed inclusion");
		harness
			.exclusion
			.upsert(&criteria(id, title, vec![0.0, 1.0], "No pregnant participants."))
			.await
			.expect("seed exclusion");
	}

	let outcome =
		harness.service.match_patient("patient-1").await.expect("match_patient failed");
	let MatchOutcome::Persisted { result } = outcome else {
		panic!("Expected a persisted outcome.");
	};

	assert_eq!(result.patient_id, "patient-1");
	assert_eq!(result.eligible_trials.len(), 1);
	assert_eq!(result.eligible_trials[0].trial_id, "NCT0001");
	assert_eq!(result.eligible_trials[0].trial_name, "Study One");
	assert_eq!(
		result.eligible_trials[0].eligibility_reasons,
		vec!["Meets every inclusion criterion.".to_string(), "No exclusion applies.".to_string()]
	);

	let written = harness.sink.written();

	assert_eq!(written.len(), 1);
	assert_eq!(written[0].eligible_trials, result.eligible_trials);
}

#[tokio::test]
async fn empty_candidate_set_still_persists_an_empty_document() {
	let providers = Providers::new(
		Arc::new(StubEmbedding { vector: vec![1.0, 0.0] }),
		Arc::new(ScriptedCompletion::new(Vec::new())),
	);
	let harness =
		build_harness(super::test_config(), Arc::new(MemoryProfiles::default()), providers);

	harness
		.patients
		.upsert(&patient_vector("patient-1", vec![1.0, 0.0], "Healthy adult."))
		.await
		.expect("seed patient");

	let outcome =
		harness.service.match_patient("patient-1").await.expect("match_patient failed");

	assert!(matches!(outcome, MatchOutcome::Persisted { .. }));

	let written = harness.sink.written();

	assert_eq!(written.len(), 1);
	assert!(written[0].eligible_trials.is_empty());
}
