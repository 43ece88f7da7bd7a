use sqlx::{
	Row,
	sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
};
use time::{Date, OffsetDateTime, macros::format_description};

use crate::{BoxFuture, Error, ProfileSource, Result};
use trialmatch_domain::{
	AllergyReaction, AllergyRecord, ConditionRecord, ImmunizationRecord, MedicationRecord,
	ObservationRecord, PatientProfile, ProcedureRecord,
};

/// Read-only view over the patient source data set: one SQLite database
/// with per-category tables keyed by patient ID.
pub struct SqliteProfiles {
	pool: SqlitePool,
}
impl SqliteProfiles {
	pub async fn open(cfg: &trialmatch_config::Profiles) -> Result<Self> {
		let options = SqliteConnectOptions::new().filename(&cfg.database).read_only(true);
		let pool = SqlitePoolOptions::new().max_connections(2).connect_with(options).await?;

		Ok(Self { pool })
	}

	pub fn from_pool(pool: SqlitePool) -> Self {
		Self { pool }
	}

	async fn list_patients(&self) -> Result<Vec<String>> {
		let ids = sqlx::query_scalar::<_, String>("SELECT id FROM patients ORDER BY id")
			.fetch_all(&self.pool)
			.await?;

		Ok(ids)
	}

	async fn load_profile(&self, patient_id: &str) -> Result<PatientProfile> {
		let row = sqlx::query("SELECT birthdate, gender FROM patients WHERE id = ?1")
			.bind(patient_id)
			.fetch_optional(&self.pool)
			.await?
			.ok_or_else(|| Error::NotFound {
				store: "patients".to_string(),
				id: patient_id.to_string(),
			})?;
		let birthdate: Option<String> = row.try_get("birthdate")?;
		let gender: Option<String> = row.try_get("gender")?;
		let today = OffsetDateTime::now_utc().date();
		let age = birthdate.as_deref().and_then(|raw| age_from_birthdate(raw, today));

		Ok(PatientProfile {
			patient_id: patient_id.to_string(),
			age,
			gender,
			allergies: self.allergies(patient_id).await?,
			conditions: self.conditions(patient_id).await?,
			immunizations: self.immunizations(patient_id).await?,
			medications: self.medications(patient_id).await?,
			observations: self.observations(patient_id).await?,
			procedures: self.procedures(patient_id).await?,
		})
	}

	async fn allergies(&self, patient_id: &str) -> Result<Vec<AllergyRecord>> {
		let rows = sqlx::query(
			"\
SELECT description, type, category,
	reaction1, description1, severity1,
	reaction2, description2, severity2
FROM allergies
WHERE patient = ?1
ORDER BY description",
		)
		.bind(patient_id)
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter().map(|row| allergy_record(&row)).collect()
	}

	async fn conditions(&self, patient_id: &str) -> Result<Vec<ConditionRecord>> {
		let rows = sqlx::query(
			"SELECT start, stop, description FROM conditions WHERE patient = ?1 ORDER BY start",
		)
		.bind(patient_id)
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter()
			.map(|row| {
				Ok(ConditionRecord {
					start: row.try_get("start")?,
					stop: row.try_get("stop")?,
					description: row.try_get("description")?,
				})
			})
			.collect()
	}

	async fn immunizations(&self, patient_id: &str) -> Result<Vec<ImmunizationRecord>> {
		let rows = sqlx::query(
			"SELECT description FROM immunizations WHERE patient = ?1 ORDER BY description",
		)
		.bind(patient_id)
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter()
			.map(|row| Ok(ImmunizationRecord { description: row.try_get("description")? }))
			.collect()
	}

	async fn medications(&self, patient_id: &str) -> Result<Vec<MedicationRecord>> {
		let rows = sqlx::query(
			"\
SELECT start, stop, description, reasondescription
FROM medications
WHERE patient = ?1
ORDER BY start",
		)
		.bind(patient_id)
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter()
			.map(|row| {
				Ok(MedicationRecord {
					start: row.try_get("start")?,
					stop: row.try_get("stop")?,
					description: row.try_get("description")?,
					reason: row.try_get("reasondescription")?,
				})
			})
			.collect()
	}

	async fn observations(&self, patient_id: &str) -> Result<Vec<ObservationRecord>> {
		let rows = sqlx::query(
			"\
SELECT category, description, value, units, type
FROM observations
WHERE patient = ?1
ORDER BY description",
		)
		.bind(patient_id)
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter()
			.map(|row| {
				Ok(ObservationRecord {
					category: row.try_get("category")?,
					description: row.try_get("description")?,
					value: row.try_get("value")?,
					units: row.try_get("units")?,
					kind: row.try_get("type")?,
				})
			})
			.collect()
	}

	async fn procedures(&self, patient_id: &str) -> Result<Vec<ProcedureRecord>> {
		let rows = sqlx::query(
			"\
SELECT start, stop, description, reasondescription
FROM procedures
WHERE patient = ?1
ORDER BY start",
		)
		.bind(patient_id)
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter()
			.map(|row| {
				Ok(ProcedureRecord {
					start: row.try_get("start")?,
					stop: row.try_get("stop")?,
					description: row.try_get("description")?,
					reason: row.try_get("reasondescription")?,
				})
			})
			.collect()
	}
}

impl ProfileSource for SqliteProfiles {
	fn patient_ids<'a>(&'a self) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(self.list_patients())
	}

	fn profile<'a>(&'a self, patient_id: &'a str) -> BoxFuture<'a, Result<PatientProfile>> {
		Box::pin(self.load_profile(patient_id))
	}
}

fn allergy_record(row: &SqliteRow) -> Result<AllergyRecord> {
	let mut reactions = Vec::new();

	for (reaction_col, description_col, severity_col) in [
		("reaction1", "description1", "severity1"),
		("reaction2", "description2", "severity2"),
	] {
		let reaction = AllergyReaction {
			reaction: row.try_get(reaction_col)?,
			description: row.try_get(description_col)?,
			severity: row.try_get(severity_col)?,
		};

		if !reaction.is_empty() {
			reactions.push(reaction);
		}
	}

	Ok(AllergyRecord {
		description: row.try_get("description")?,
		kind: row.try_get("type")?,
		category: row.try_get("category")?,
		reactions,
	})
}

fn age_from_birthdate(raw: &str, today: Date) -> Option<u32> {
	let format = format_description!("[year]-[month]-[day]");
	let birthdate = Date::parse(raw, &format).ok()?;
	let mut age = i64::from(today.year()) - i64::from(birthdate.year());

	if (today.month() as u8, today.day()) < (birthdate.month() as u8, birthdate.day()) {
		age -= 1;
	}

	u32::try_from(age).ok()
}
