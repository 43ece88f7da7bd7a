use std::{collections::HashMap, sync::Arc};

use qdrant_client::{
	Payload, Qdrant,
	qdrant::{
		CreateCollectionBuilder, Distance, GetPointsBuilder, PointId, PointStruct, Query,
		QueryPointsBuilder, RetrievedPoint, UpsertPointsBuilder, Value, VectorParamsBuilder,
		VectorsOutput, value::Kind, vector_output, vectors_output::VectorsOptions,
	},
};
use uuid::Uuid;

use crate::{BoxFuture, Error, QueryHit, Result, StoredDocument, VectorRecord, VectorStore};

const SOURCE_ID_KEY: &str = "source_id";
const DOCUMENT_KEY: &str = "document";
const TITLE_KEY: &str = "title";

/// One Qdrant collection exposed through the `VectorStore` contract. The
/// three stores share a single client.
pub struct QdrantStore {
	pub client: Arc<Qdrant>,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn connect(cfg: &trialmatch_config::Qdrant) -> Result<Arc<Qdrant>> {
		let client = Qdrant::from_url(&cfg.url).build()?;

		Ok(Arc::new(client))
	}

	pub fn new(client: Arc<Qdrant>, collection: &str, vector_dim: u32) -> Self {
		Self { client, collection: collection.to_string(), vector_dim }
	}

	/// Create the collection (cosine distance, configured dimension) if it
	/// does not exist yet. Only the patient store is created by this
	/// process; the criteria collections belong to ingestion.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(());
		}

		let builder = CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
			VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine),
		);

		self.client.create_collection(builder).await?;

		Ok(())
	}

	async fn retrieve(
		&self,
		id: &str,
		with_payload: bool,
		with_vectors: bool,
	) -> Result<RetrievedPoint> {
		let ids = vec![PointId::from(point_id_for(id).to_string())];
		let request = GetPointsBuilder::new(self.collection.clone(), ids)
			.with_payload(with_payload)
			.with_vectors(with_vectors);
		let response = self.client.get_points(request).await?;

		response.result.into_iter().next().ok_or_else(|| Error::NotFound {
			store: self.collection.clone(),
			id: id.to_string(),
		})
	}

	fn dense_vector_of(&self, id: &str, vectors: Option<VectorsOutput>) -> Result<Vec<f32>> {
		dense_vector(vectors).ok_or_else(|| Error::InvalidRecord {
			message: format!(
				"Entry {id:?} in {} is missing a dense vector.",
				self.collection
			),
		})
	}
}

impl VectorStore for QdrantStore {
	fn exists<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			let ids = vec![PointId::from(point_id_for(id).to_string())];
			let request = GetPointsBuilder::new(self.collection.clone(), ids)
				.with_payload(false)
				.with_vectors(false);
			let response = self.client.get_points(request).await?;

			Ok(!response.result.is_empty())
		})
	}

	fn upsert<'a>(&'a self, record: &'a VectorRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if record.embedding.len() != self.vector_dim as usize {
				return Err(Error::InvalidRecord {
					message: format!(
						"Embedding for {:?} has {} dimensions, collection {} expects {}.",
						record.id,
						record.embedding.len(),
						self.collection,
						self.vector_dim
					),
				});
			}

			let mut payload_map = HashMap::new();

			payload_map.insert(SOURCE_ID_KEY.to_string(), Value::from(record.id.clone()));
			payload_map.insert(DOCUMENT_KEY.to_string(), Value::from(record.document.clone()));

			if let Some(title) = &record.title {
				payload_map.insert(TITLE_KEY.to_string(), Value::from(title.clone()));
			}

			let point = PointStruct::new(
				point_id_for(&record.id).to_string(),
				record.embedding.clone(),
				Payload::from(payload_map),
			);
			let request =
				UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true);

			self.client.upsert_points(request).await?;

			Ok(())
		})
	}

	fn fetch<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<VectorRecord>> {
		Box::pin(async move {
			let point = self.retrieve(id, true, true).await?;
			let embedding = self.dense_vector_of(id, point.vectors)?;
			let document = payload_str(&point.payload, DOCUMENT_KEY).unwrap_or_default();
			let title = payload_str(&point.payload, TITLE_KEY);

			Ok(VectorRecord { id: id.to_string(), embedding, document, title })
		})
	}

	fn fetch_embedding<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async move {
			let point = self.retrieve(id, false, true).await?;

			self.dense_vector_of(id, point.vectors)
		})
	}

	fn fetch_document<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<StoredDocument>> {
		Box::pin(async move {
			let point = self.retrieve(id, true, false).await?;
			let text = payload_str(&point.payload, DOCUMENT_KEY).unwrap_or_default();
			let title = payload_str(&point.payload, TITLE_KEY);

			Ok(StoredDocument { text, title })
		})
	}

	fn query<'a>(&'a self, embedding: &'a [f32], k: u32) -> BoxFuture<'a, Result<Vec<QueryHit>>> {
		Box::pin(async move {
			let request = QueryPointsBuilder::new(self.collection.clone())
				.query(Query::new_nearest(embedding.to_vec()))
				.limit(u64::from(k))
				.with_payload(true)
				.with_vectors(true);
			let response = self.client.query(request).await?;
			let mut hits = Vec::with_capacity(response.result.len());

			for point in response.result {
				let Some(id) = payload_str(&point.payload, SOURCE_ID_KEY) else {
					return Err(Error::InvalidRecord {
						message: format!(
							"A point in {} has no source_id payload.",
							self.collection
						),
					});
				};
				let embedding = self.dense_vector_of(&id, point.vectors)?;
				let title = payload_str(&point.payload, TITLE_KEY);

				hits.push(QueryHit { id, embedding, title, score: point.score });
			}

			Ok(hits)
		})
	}
}

/// Qdrant point IDs must be UUIDs; derive one deterministically from the
/// external identifier and keep the external ID in the payload.
fn point_id_for(id: &str) -> Uuid {
	Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes())
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match payload.get(key).and_then(|value| value.kind.as_ref()) {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}

fn dense_vector(vectors: Option<VectorsOutput>) -> Option<Vec<f32>> {
	let output = match vectors?.vectors_options? {
		VectorsOptions::Vector(vector) => vector,
		VectorsOptions::Vectors(_) => return None,
	};

	if !output.data.is_empty() {
		return Some(output.data);
	}

	match output.vector? {
		vector_output::Vector::Dense(dense) => Some(dense.data),
		_ => None,
	}
}
