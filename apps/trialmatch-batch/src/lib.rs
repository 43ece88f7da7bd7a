use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trialmatch_service::{MatchService, TrialStores};
use trialmatch_storage::{profiles::SqliteProfiles, qdrant::QdrantStore, sink::JsonResultSink};

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = trialmatch_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let qdrant = &config.storage.qdrant;
	let client = QdrantStore::connect(qdrant)?;
	let inclusion =
		QdrantStore::new(client.clone(), &qdrant.inclusion_collection, qdrant.vector_dim);
	let exclusion =
		QdrantStore::new(client.clone(), &qdrant.exclusion_collection, qdrant.vector_dim);
	let patients = QdrantStore::new(client, &qdrant.patient_collection, qdrant.vector_dim);

	// The criteria collections belong to ingestion; only the patient cache
	// is created here if missing.
	patients.ensure_collection().await?;

	let profiles = Arc::new(SqliteProfiles::open(&config.storage.profiles).await?);
	let sink = Arc::new(JsonResultSink::create(&config.storage.results.dir)?);
	let stores = TrialStores {
		inclusion: Arc::new(inclusion),
		exclusion: Arc::new(exclusion),
		patients: Arc::new(patients),
	};
	let service = MatchService::new(config, stores, profiles, sink);
	let summary = service.run_batch().await?;

	tracing::info!(
		persisted = summary.persisted,
		aborted = summary.aborted,
		failed = summary.failed,
		"Batch run complete."
	);

	Ok(())
}
