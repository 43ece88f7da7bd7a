pub mod profiles;
pub mod qdrant;
pub mod sink;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin};

use trialmatch_domain::{MatchResult, PatientProfile};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One stored entry: the external identifier (trial or patient ID), its
/// embedding, the source document, and the study title for criteria
/// entries.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorRecord {
	pub id: String,
	pub embedding: Vec<f32>,
	pub document: String,
	pub title: Option<String>,
}

/// Field-selective read of a stored entry's text side.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
	pub text: String,
	pub title: Option<String>,
}

/// One nearest-neighbor result; `score` is cosine similarity, best first.
#[derive(Clone, Debug)]
pub struct QueryHit {
	pub id: String,
	pub embedding: Vec<f32>,
	pub title: Option<String>,
	pub score: f32,
}

/// Contract for the three vector stores (inclusion criteria, exclusion
/// criteria, patient vectors). `fetch*` fails with `Error::NotFound` when
/// the ID is absent; callers check `exists` first when absence is an
/// expected case.
pub trait VectorStore
where
	Self: Send + Sync,
{
	fn exists<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<bool>>;
	/// Insert or fully replace; repeated upserts with identical content
	/// produce no observable change.
	fn upsert<'a>(&'a self, record: &'a VectorRecord) -> BoxFuture<'a, Result<()>>;
	fn fetch<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<VectorRecord>>;
	fn fetch_embedding<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Vec<f32>>>;
	fn fetch_document<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<StoredDocument>>;
	fn query<'a>(&'a self, embedding: &'a [f32], k: u32) -> BoxFuture<'a, Result<Vec<QueryHit>>>;
}

/// Source of structured patient records.
pub trait ProfileSource
where
	Self: Send + Sync,
{
	fn patient_ids<'a>(&'a self) -> BoxFuture<'a, Result<Vec<String>>>;
	fn profile<'a>(&'a self, patient_id: &'a str) -> BoxFuture<'a, Result<PatientProfile>>;
}

/// Destination for finished match documents; one document per patient ID,
/// overwrite semantics.
pub trait ResultSink
where
	Self: Send + Sync,
{
	fn write<'a>(&'a self, result: &'a MatchResult) -> BoxFuture<'a, Result<()>>;
}
