use std::sync::Arc;

use mark_service::MarkService;
use mark_storage::RecordSource;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MarkService>,
}
impl AppState {
	/// Serves the on-disk library under `storage.data_dir`.
	pub fn new(config: mark_config::Config) -> Self {
		Self { service: Arc::new(MarkService::with_file_store(config)) }
	}

	pub fn with_source(config: mark_config::Config, source: Arc<dyn RecordSource>) -> Self {
		Self { service: Arc::new(MarkService::new(config, source)) }
	}
}
