use std::sync::Arc;

use trialmatch_domain::PatientProfile;
use trialmatch_service::{BatchSummary, MatchService, Providers, TrialStores};
use trialmatch_storage::VectorStore;
use trialmatch_testkit::{FailingSink, MemoryProfiles, MemoryVectorStore};

use super::{Scripted, ScriptedCompletion, StubEmbedding, build_harness, patient_vector};

fn profile(patient_id: &str) -> PatientProfile {
	let mut profile = PatientProfile::default();

	profile.patient_id = patient_id.to_string();

	profile
}

/// A rate-limited summarization aborts its patient without leaving a trace
/// in the patient store; the batch keeps going.
#[tokio::test]
async fn aborted_patient_does_not_halt_the_batch() {
	let completion = ScriptedCompletion::new(vec![
		("\"patient-1\"", Scripted::RateLimited),
		("\"patient-2\"", Scripted::Reply("An unremarkable adult.".to_string())),
	]);
	let providers = Providers::new(
		Arc::new(StubEmbedding { vector: vec![1.0, 0.0] }),
		Arc::new(completion),
	);
	let harness = build_harness(
		super::test_config(),
		Arc::new(MemoryProfiles::new(vec![profile("patient-1"), profile("patient-2")])),
		providers,
	);

	let summary = harness.service.run_batch().await.expect("run_batch failed");

	assert_eq!(summary, BatchSummary { persisted: 1, aborted: 1, failed: 0 });

	// No partial state for the aborted patient: a retry starts clean.
	assert!(!harness.patients.exists("patient-1").await.expect("exists failed"));
	assert!(harness.patients.exists("patient-2").await.expect("exists failed"));

	let written = harness.sink.written();

	assert_eq!(written.len(), 1);
	assert_eq!(written[0].patient_id, "patient-2");
}

#[tokio::test]
async fn batch_processes_at_most_max_patients() {
	let mut cfg = super::test_config();

	cfg.matching.max_patients = 2;

	let completion = ScriptedCompletion::new(vec![(
		"structured clinical record",
		Scripted::Reply("A patient.".to_string()),
	)]);
	let providers = Providers::new(
		Arc::new(StubEmbedding { vector: vec![1.0, 0.0] }),
		Arc::new(completion),
	);
	let harness = build_harness(
		cfg,
		Arc::new(MemoryProfiles::new(vec![
			profile("patient-1"),
			profile("patient-2"),
			profile("patient-3"),
		])),
		providers,
	);

	let summary = harness.service.run_batch().await.expect("run_batch failed");

	assert_eq!(summary.persisted, 2);

	let written: Vec<String> =
		harness.sink.written().iter().map(|result| result.patient_id.clone()).collect();

	assert_eq!(written, vec!["patient-1".to_string(), "patient-2".to_string()]);
}

/// A sink failure is contained to its patient: logged, counted, and the
/// loop moves on.
#[tokio::test]
async fn persistence_failure_is_contained_to_the_patient() {
	let providers = Providers::new(
		Arc::new(StubEmbedding { vector: vec![1.0, 0.0] }),
		Arc::new(ScriptedCompletion::new(Vec::new())),
	);
	let patients = Arc::new(MemoryVectorStore::new("patient_vectors"));

	patients
		.upsert(&patient_vector("patient-1", vec![1.0, 0.0], "Cached adult."))
		.await
		.expect("seed patient");
	patients
		.upsert(&patient_vector("patient-2", vec![0.0, 1.0], "Another cached adult."))
		.await
		.expect("seed patient");

	let service = MatchService::with_providers(
		super::test_config(),
		TrialStores {
			inclusion: Arc::new(MemoryVectorStore::new("trial_inclusion")),
			exclusion: Arc::new(MemoryVectorStore::new("trial_exclusion")),
			patients,
		},
		Arc::new(MemoryProfiles::new(vec![profile("patient-1"), profile("patient-2")])),
		Arc::new(FailingSink),
		providers,
	);

	let summary = service.run_batch().await.expect("run_batch failed");

	assert_eq!(summary, BatchSummary { persisted: 0, aborted: 0, failed: 2 });
}
