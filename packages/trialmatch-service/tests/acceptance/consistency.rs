use std::sync::Arc;

use trialmatch_service::{Error, Providers};
use trialmatch_storage::VectorStore;
use trialmatch_testkit::MemoryProfiles;

use super::{ScriptedCompletion, StubEmbedding, build_harness, criteria, patient_vector};

/// An inclusion entry without its exclusion pair is corrupt ingestion, not
/// a missing candidate: the run must fail loudly instead of skipping the
/// trial, and the fault is the one error allowed to stop the whole batch.
#[tokio::test]
async fn missing_exclusion_pair_is_a_batch_fatal_fault() {
	let providers = Providers::new(
		Arc::new(StubEmbedding { vector: vec![1.0, 0.0] }),
		Arc::new(ScriptedCompletion::new(Vec::new())),
	);
	let harness =
		build_harness(super::test_config(), Arc::new(MemoryProfiles::default()), providers);

	harness
		.patients
		.upsert(&patient_vector("patient-1", vec![1.0, 0.0], "Adult patient."))
		.await
		.expect("seed patient");
	// Inclusion entry present, exclusion store left empty.
	harness
		.inclusion
		.upsert(&criteria("NCT0009", "Study Nine", vec![0.9, (1.0 - 0.81_f32).sqrt()], "Adults."))
		.await
		.expect("seed inclusion");

	let err = harness
		.service
		.match_patient("patient-1")
		.await
		.expect_err("Expected a consistency fault.");

	assert!(matches!(&err, Error::Consistency { trial_id } if trial_id == "NCT0009"));
	assert!(err.halts_batch());
	assert!(harness.sink.written().is_empty(), "Nothing may be persisted on a fault.");
}
