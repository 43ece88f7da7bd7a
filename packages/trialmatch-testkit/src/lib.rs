//! In-memory implementations of the storage contracts for tests that must
//! run without live services.

use std::{
	cmp::Ordering,
	io,
	sync::{Mutex, MutexGuard},
};

use trialmatch_domain::{MatchResult, PatientProfile, similarity::cosine_similarity};
use trialmatch_storage::{
	BoxFuture, Error, ProfileSource, QueryHit, Result, ResultSink, StoredDocument, VectorRecord,
	VectorStore,
};

/// Exact-scan vector store: cosine ranking over every entry, ties resolved
/// by insertion order.
pub struct MemoryVectorStore {
	name: String,
	entries: Mutex<Vec<VectorRecord>>,
}
impl MemoryVectorStore {
	pub fn new(name: &str) -> Self {
		Self { name: name.to_string(), entries: Mutex::new(Vec::new()) }
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	fn lock(&self) -> MutexGuard<'_, Vec<VectorRecord>> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn get(&self, id: &str) -> Result<VectorRecord> {
		self.lock().iter().find(|record| record.id == id).cloned().ok_or_else(|| {
			Error::NotFound { store: self.name.clone(), id: id.to_string() }
		})
	}
}

impl VectorStore for MemoryVectorStore {
	fn exists<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<bool>> {
		let found = self.lock().iter().any(|record| record.id == id);

		Box::pin(async move { Ok(found) })
	}

	fn upsert<'a>(&'a self, record: &'a VectorRecord) -> BoxFuture<'a, Result<()>> {
		{
			let mut entries = self.lock();

			if let Some(existing) = entries.iter_mut().find(|entry| entry.id == record.id) {
				*existing = record.clone();
			} else {
				entries.push(record.clone());
			}
		}

		Box::pin(async move { Ok(()) })
	}

	fn fetch<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<VectorRecord>> {
		let outcome = self.get(id);

		Box::pin(async move { outcome })
	}

	fn fetch_embedding<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
		let outcome = self.get(id).map(|record| record.embedding);

		Box::pin(async move { outcome })
	}

	fn fetch_document<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<StoredDocument>> {
		let outcome =
			self.get(id).map(|record| StoredDocument { text: record.document, title: record.title });

		Box::pin(async move { outcome })
	}

	fn query<'a>(&'a self, embedding: &'a [f32], k: u32) -> BoxFuture<'a, Result<Vec<QueryHit>>> {
		let mut hits: Vec<QueryHit> = self
			.lock()
			.iter()
			.map(|record| QueryHit {
				id: record.id.clone(),
				embedding: record.embedding.clone(),
				title: record.title.clone(),
				score: cosine_similarity(embedding, &record.embedding),
			})
			.collect();

		hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
		hits.truncate(k as usize);

		Box::pin(async move { Ok(hits) })
	}
}

/// Fixed set of structured records, listed in insertion order.
#[derive(Default)]
pub struct MemoryProfiles {
	profiles: Mutex<Vec<PatientProfile>>,
}
impl MemoryProfiles {
	pub fn new(profiles: Vec<PatientProfile>) -> Self {
		Self { profiles: Mutex::new(profiles) }
	}

	fn lock(&self) -> MutexGuard<'_, Vec<PatientProfile>> {
		self.profiles.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl ProfileSource for MemoryProfiles {
	fn patient_ids<'a>(&'a self) -> BoxFuture<'a, Result<Vec<String>>> {
		let ids = self.lock().iter().map(|profile| profile.patient_id.clone()).collect();

		Box::pin(async move { Ok(ids) })
	}

	fn profile<'a>(&'a self, patient_id: &'a str) -> BoxFuture<'a, Result<PatientProfile>> {
		let outcome = self
			.lock()
			.iter()
			.find(|profile| profile.patient_id == patient_id)
			.cloned()
			.ok_or_else(|| Error::NotFound {
				store: "patients".to_string(),
				id: patient_id.to_string(),
			});

		Box::pin(async move { outcome })
	}
}

/// Collects written match documents for assertions.
#[derive(Default)]
pub struct MemorySink {
	written: Mutex<Vec<MatchResult>>,
}
impl MemorySink {
	pub fn written(&self) -> Vec<MatchResult> {
		self.written.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}

impl ResultSink for MemorySink {
	fn write<'a>(&'a self, result: &'a MatchResult) -> BoxFuture<'a, Result<()>> {
		let mut written = self.written.lock().unwrap_or_else(|err| err.into_inner());

		written.retain(|existing| existing.patient_id != result.patient_id);
		written.push(result.clone());

		Box::pin(async move { Ok(()) })
	}
}

/// Fails every write, for persistence-containment tests.
#[derive(Default)]
pub struct FailingSink;

impl ResultSink for FailingSink {
	fn write<'a>(&'a self, result: &'a MatchResult) -> BoxFuture<'a, Result<()>> {
		let outcome = Err(Error::Io {
			path: std::path::PathBuf::from(format!("{}.json", result.patient_id)),
			source: io::Error::new(io::ErrorKind::PermissionDenied, "sink is read-only"),
		});

		Box::pin(async move { outcome })
	}
}
