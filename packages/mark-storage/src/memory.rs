use std::{collections::HashMap, sync::Arc};

use mark_domain::BookmarkRecord;

use crate::{
	BoxFuture, Result,
	source::{RecordSource, validate_scope},
};

/// Fixed per-scope snapshots held in memory. Unknown scopes are empty.
#[derive(Clone, Default)]
pub struct MemoryStore {
	libraries: HashMap<String, Arc<[BookmarkRecord]>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_library(mut self, scope: impl Into<String>, records: Vec<BookmarkRecord>) -> Self {
		self.insert(scope, records);

		self
	}

	pub fn insert(&mut self, scope: impl Into<String>, records: Vec<BookmarkRecord>) {
		self.libraries.insert(scope.into(), Arc::from(records));
	}
}
impl RecordSource for MemoryStore {
	fn fetch_all<'a>(&'a self, scope: &'a str) -> BoxFuture<'a, Result<Vec<BookmarkRecord>>> {
		Box::pin(async move {
			let scope = validate_scope(scope)?;

			Ok(self.libraries.get(scope).map(|records| records.to_vec()).unwrap_or_default())
		})
	}
}
