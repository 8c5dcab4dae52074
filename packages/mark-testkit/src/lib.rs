mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use time::{Duration, OffsetDateTime, macros::datetime};
use uuid::Uuid;

use mark_domain::{BookmarkRecord, SiteHealth};

/// Fixed reference instant for tests that depend on record age.
pub const REFERENCE_NOW: OffsetDateTime = datetime!(2024-06-01 12:00 UTC);

/// Builder for bookmark fixtures. Everything not set explicitly gets a neutral value.
#[derive(Clone, Debug)]
pub struct BookmarkBuilder {
	record: BookmarkRecord,
}
impl BookmarkBuilder {
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		let id = id.into();

		Self {
			record: BookmarkRecord {
				url: format!("https://example.com/{id}"),
				id,
				title: title.into(),
				description: None,
				category: None,
				tags: Vec::new(),
				ai_tags: Vec::new(),
				ai_summary: None,
				ai_category: None,
				notes: None,
				site_health: SiteHealth::Unknown,
				created_at: REFERENCE_NOW,
				updated_at: REFERENCE_NOW,
				visits: 0,
				time_spent: 0,
			},
		}
	}

	pub fn url(mut self, url: &str) -> Self {
		self.record.url = url.to_string();

		self
	}

	pub fn description(mut self, description: &str) -> Self {
		self.record.description = Some(description.to_string());

		self
	}

	pub fn category(mut self, category: &str) -> Self {
		self.record.category = Some(category.to_string());

		self
	}

	pub fn ai_category(mut self, category: &str) -> Self {
		self.record.ai_category = Some(category.to_string());

		self
	}

	pub fn tags(mut self, tags: &[&str]) -> Self {
		self.record.tags = tags.iter().map(|tag| tag.to_string()).collect();

		self
	}

	pub fn ai_tags(mut self, tags: &[&str]) -> Self {
		self.record.ai_tags = tags.iter().map(|tag| tag.to_string()).collect();

		self
	}

	pub fn notes(mut self, notes: &str) -> Self {
		self.record.notes = Some(notes.to_string());

		self
	}

	pub fn ai_summary(mut self, summary: &str) -> Self {
		self.record.ai_summary = Some(summary.to_string());

		self
	}

	pub fn site_health(mut self, health: SiteHealth) -> Self {
		self.record.site_health = health;

		self
	}

	pub fn visits(mut self, visits: u64) -> Self {
		self.record.visits = visits;

		self
	}

	pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
		self.record.created_at = created_at;

		self
	}

	pub fn updated_at(mut self, updated_at: OffsetDateTime) -> Self {
		self.record.updated_at = updated_at;

		self
	}

	/// Sets `created_at` relative to [`REFERENCE_NOW`].
	pub fn age_days(self, days: i64) -> Self {
		self.created_at(REFERENCE_NOW - Duration::days(days))
	}

	pub fn build(self) -> BookmarkRecord {
		self.record
	}
}

pub fn bookmark(id: &str, title: &str) -> BookmarkBuilder {
	BookmarkBuilder::new(id, title)
}

/// A throwaway on-disk library root laid out the way the file store expects.
pub struct TempLibrary {
	root: PathBuf,
	cleaned: bool,
}
impl TempLibrary {
	pub fn new() -> Result<Self> {
		let root = env::temp_dir().join(format!("mark_test_{}", Uuid::new_v4().simple()));

		fs::create_dir_all(&root)?;

		Ok(Self { root, cleaned: false })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn write(&self, scope: &str, records: &[BookmarkRecord]) -> Result<PathBuf> {
		let payload = serde_json::to_vec_pretty(records)?;

		self.write_raw(scope, &payload)
	}

	pub fn write_raw(&self, scope: &str, payload: &[u8]) -> Result<PathBuf> {
		if scope.contains(['/', '\\']) {
			return Err(Error::Message(format!("Scope '{scope}' must be a single path segment.")));
		}

		let dir = self.root.join(scope);

		fs::create_dir_all(&dir)?;

		let path = dir.join("bookmarks.json");

		fs::write(&path, payload)?;

		Ok(path)
	}

	pub fn cleanup(mut self) -> Result<()> {
		self.cleaned = true;

		fs::remove_dir_all(&self.root)?;

		Ok(())
	}
}
impl Drop for TempLibrary {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let _ = fs::remove_dir_all(&self.root);
	}
}
