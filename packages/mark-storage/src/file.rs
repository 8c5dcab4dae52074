use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};

use mark_domain::BookmarkRecord;

use crate::{
	BoxFuture, Error, Result,
	source::{RecordSource, validate_scope},
};

pub const LIBRARY_FILE_NAME: &str = "bookmarks.json";

/// Reads `<root>/<scope>/bookmarks.json`, a JSON array of bookmark records.
///
/// Every call re-reads the file, so each search sees the library as it was at that moment.
pub struct FileStore {
	root: PathBuf,
}
impl FileStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn from_config(cfg: &mark_config::Storage) -> Self {
		Self::new(cfg.data_dir.clone())
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn library_path(&self, scope: &str) -> Result<PathBuf> {
		let scope = validate_scope(scope)?;

		Ok(self.root.join(scope).join(LIBRARY_FILE_NAME))
	}

	async fn read_library(&self, scope: &str) -> Result<Vec<BookmarkRecord>> {
		let path = self.library_path(scope)?;
		let raw = match tokio::fs::read(&path).await {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "Library file missing; treating as empty.");

				return Ok(Vec::new());
			},
			Err(err) => return Err(Error::Io { path, source: err }),
		};

		if raw.iter().all(u8::is_ascii_whitespace) {
			return Ok(Vec::new());
		}

		let records: Vec<BookmarkRecord> = serde_json::from_slice(&raw)
			.map_err(|source| Error::Corrupt { path: path.clone(), source })?;

		tracing::debug!(path = %path.display(), count = records.len(), "Loaded library.");

		Ok(records)
	}
}
impl RecordSource for FileStore {
	fn fetch_all<'a>(&'a self, scope: &'a str) -> BoxFuture<'a, Result<Vec<BookmarkRecord>>> {
		Box::pin(self.read_library(scope))
	}
}
