use serde::Serialize;

/// Structured clinical record for one patient, assembled by the profile
/// source. Typed per clinical category so producer and consumer cannot
/// drift apart on field names.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PatientProfile {
	pub patient_id: String,
	pub age: Option<u32>,
	pub gender: Option<String>,
	pub allergies: Vec<AllergyRecord>,
	pub conditions: Vec<ConditionRecord>,
	pub immunizations: Vec<ImmunizationRecord>,
	pub medications: Vec<MedicationRecord>,
	pub observations: Vec<ObservationRecord>,
	pub procedures: Vec<ProcedureRecord>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct AllergyRecord {
	pub description: Option<String>,
	pub kind: Option<String>,
	pub category: Option<String>,
	pub reactions: Vec<AllergyReaction>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct AllergyReaction {
	pub reaction: Option<String>,
	pub description: Option<String>,
	pub severity: Option<String>,
}
impl AllergyReaction {
	pub fn is_empty(&self) -> bool {
		self.reaction.is_none() && self.description.is_none() && self.severity.is_none()
	}
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ConditionRecord {
	pub start: Option<String>,
	pub stop: Option<String>,
	pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ImmunizationRecord {
	pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MedicationRecord {
	pub start: Option<String>,
	pub stop: Option<String>,
	pub description: Option<String>,
	pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ObservationRecord {
	pub category: Option<String>,
	pub description: Option<String>,
	pub value: Option<String>,
	pub units: Option<String>,
	pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ProcedureRecord {
	pub start: Option<String>,
	pub stop: Option<String>,
	pub description: Option<String>,
	pub reason: Option<String>,
}
