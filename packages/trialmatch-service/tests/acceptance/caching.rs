use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use trialmatch_domain::PatientProfile;
use trialmatch_service::{MatchOutcome, Providers};
use trialmatch_storage::VectorStore;
use trialmatch_testkit::MemoryProfiles;

use super::{Scripted, ScriptedCompletion, SpyEmbedding};

fn profile(patient_id: &str) -> PatientProfile {
	let mut profile = PatientProfile::default();

	profile.patient_id = patient_id.to_string();
	profile.age = Some(51);
	profile.gender = Some("M".to_string());

	profile
}

/// The patient store is a write-once cache: the second run for the same
/// patient must replay the stored narrative and embedding, spending zero
/// summarizer and zero embedding-model calls.
#[tokio::test]
async fn second_run_is_a_pure_cache_hit() {
	let completion = ScriptedCompletion::new(vec![(
		"\"patient-1\"",
		Scripted::Reply("A 51 year old man with no recorded conditions.".to_string()),
	)]);
	let summarizer_calls = completion.summarizer_calls.clone();
	let embed_calls = Arc::new(AtomicUsize::new(0));
	let providers = Providers::new(
		Arc::new(SpyEmbedding { vector: vec![1.0, 0.0], calls: embed_calls.clone() }),
		Arc::new(completion),
	);
	let harness = super::build_harness(
		super::test_config(),
		Arc::new(MemoryProfiles::new(vec![profile("patient-1")])),
		providers,
	);

	let first = harness.service.match_patient("patient-1").await.expect("first run failed");

	assert!(matches!(first, MatchOutcome::Persisted { .. }));
	assert_eq!(summarizer_calls.load(Ordering::SeqCst), 1);
	assert_eq!(embed_calls.load(Ordering::SeqCst), 1);
	assert_eq!(harness.patients.len(), 1);

	let second = harness.service.match_patient("patient-1").await.expect("second run failed");

	assert!(matches!(second, MatchOutcome::Persisted { .. }));
	assert_eq!(summarizer_calls.load(Ordering::SeqCst), 1, "Summarizer must not run again.");
	assert_eq!(embed_calls.load(Ordering::SeqCst), 1, "Embedding model must not run again.");

	let cached = harness.patients.fetch("patient-1").await.expect("cached vector missing");

	assert_eq!(cached.document, "A 51 year old man with no recorded conditions.");
	assert_eq!(cached.embedding, vec![1.0, 0.0]);

	// Rerun overwrote, not appended.
	assert_eq!(harness.sink.written().len(), 1);
}
