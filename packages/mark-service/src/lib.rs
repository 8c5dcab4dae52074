pub mod search;

mod error;

pub use error::{Error, Result};
pub use search::{
	DateHistogram, FacetBucket, Facets, SearchError, SearchFilters, SearchItem, SearchOptions,
	SearchRequest, SearchResponse, SortBy, SortOrder,
};

use std::sync::Arc;

use mark_config::Config;
use mark_storage::{FileStore, RecordSource};

pub struct MarkService {
	pub cfg: Config,
	pub source: Arc<dyn RecordSource>,
}
impl MarkService {
	pub fn new(cfg: Config, source: Arc<dyn RecordSource>) -> Self {
		Self { cfg, source }
	}

	/// Builds a service backed by the on-disk library configured under `[storage]`.
	pub fn with_file_store(cfg: Config) -> Self {
		let source = Arc::new(FileStore::from_config(&cfg.storage));

		Self { cfg, source }
	}

	pub fn search_options(&self) -> SearchOptions {
		SearchOptions::from_config(&self.cfg.search)
	}
}
