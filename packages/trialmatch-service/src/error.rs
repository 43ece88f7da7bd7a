pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The pairing invariant is broken: an inclusion-listed trial has no
	/// exclusion entry. Signals corrupt or incomplete ingestion; the only
	/// error allowed to stop the whole batch.
	#[error("Exclusion entry missing for trial {trial_id}; criteria stores are inconsistent.")]
	Consistency { trial_id: String },
	#[error(transparent)]
	Store(#[from] trialmatch_storage::Error),
	#[error("Failed to persist match result for patient {patient_id}.")]
	Sink { patient_id: String, source: trialmatch_storage::Error },
}
impl Error {
	pub fn halts_batch(&self) -> bool {
		matches!(self, Self::Consistency { .. })
	}
}
