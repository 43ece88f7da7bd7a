use std::{
	fs,
	path::{Path, PathBuf},
};

use crate::{BoxFuture, Error, Result, ResultSink};
use trialmatch_domain::MatchResult;

/// Writes one pretty-printed JSON document per patient ID into a directory,
/// replacing any previous run's document for the same patient.
pub struct JsonResultSink {
	dir: PathBuf,
}
impl JsonResultSink {
	pub fn create(dir: &Path) -> Result<Self> {
		fs::create_dir_all(dir)
			.map_err(|err| Error::Io { path: dir.to_path_buf(), source: err })?;

		Ok(Self { dir: dir.to_path_buf() })
	}

	pub fn path_for(&self, patient_id: &str) -> PathBuf {
		self.dir.join(format!("{patient_id}.json"))
	}

	fn write_document(&self, result: &MatchResult) -> Result<()> {
		let json = serde_json::to_string_pretty(result)?;
		let path = self.path_for(&result.patient_id);

		fs::write(&path, json).map_err(|err| Error::Io { path, source: err })
	}
}

impl ResultSink for JsonResultSink {
	fn write<'a>(&'a self, result: &'a MatchResult) -> BoxFuture<'a, Result<()>> {
		let outcome = self.write_document(result);

		Box::pin(async move { outcome })
	}
}
