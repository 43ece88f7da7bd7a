pub mod profile;
pub mod result;
pub mod selection;
pub mod similarity;
pub mod verdict;

pub use profile::{
	AllergyReaction, AllergyRecord, ConditionRecord, ImmunizationRecord, MedicationRecord,
	ObservationRecord, PatientProfile, ProcedureRecord,
};
pub use result::{MatchResult, TrialVerdict};
pub use selection::{CandidateScore, select_candidates};
pub use similarity::{cosine_similarity, eligibility_score};
pub use verdict::{AdjudicationReply, parse_reply};
