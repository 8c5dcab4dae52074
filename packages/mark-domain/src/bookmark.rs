use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// Reported reachability of a bookmarked site.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteHealth {
	Excellent,
	Working,
	Fair,
	Poor,
	Broken,
	#[default]
	#[serde(other)]
	Unknown,
}
impl SiteHealth {
	pub const ALL: [Self; 6] =
		[Self::Excellent, Self::Working, Self::Fair, Self::Poor, Self::Broken, Self::Unknown];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Excellent => "excellent",
			Self::Working => "working",
			Self::Fair => "fair",
			Self::Poor => "poor",
			Self::Broken => "broken",
			Self::Unknown => "unknown",
		}
	}

	/// Case-insensitive lookup. Returns `None` for labels outside the closed set.
	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|health| health.as_str().eq_ignore_ascii_case(raw))
	}
}
impl Display for SiteHealth {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A bookmark as handed over by the record source. Search treats it as an immutable snapshot.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BookmarkRecord {
	pub id: String,
	pub title: String,
	pub url: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub tags: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub ai_tags: Vec<String>,
	#[serde(default)]
	pub ai_summary: Option<String>,
	#[serde(default)]
	pub ai_category: Option<String>,
	#[serde(default)]
	pub notes: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub site_health: SiteHealth,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	#[serde(default, deserialize_with = "null_as_default")]
	pub visits: u64,
	/// Seconds.
	#[serde(default, deserialize_with = "null_as_default")]
	pub time_spent: u64,
}
impl BookmarkRecord {
	/// Lowercased concatenation of every text field the query filter looks at, URL included.
	pub fn filter_text(&self) -> String {
		self.joined_text(true)
	}

	/// Lowercased concatenation of the fields relevance scoring looks at. The URL is excluded.
	pub fn scoring_text(&self) -> String {
		self.joined_text(false)
	}

	/// User tags followed by AI tags, duplicates included.
	pub fn all_tags(&self) -> impl Iterator<Item = &str> {
		self.tags.iter().chain(self.ai_tags.iter()).map(String::as_str)
	}

	pub fn has_notes(&self) -> bool {
		is_present(self.notes.as_deref())
	}

	pub fn has_ai_summary(&self) -> bool {
		is_present(self.ai_summary.as_deref())
	}

	fn joined_text(&self, with_url: bool) -> String {
		let mut parts: Vec<&str> = Vec::with_capacity(8 + self.tags.len() + self.ai_tags.len());

		parts.push(&self.title);
		parts.extend(self.description.as_deref());
		parts.extend(self.notes.as_deref());
		parts.extend(self.ai_summary.as_deref());
		parts.extend(self.tags.iter().map(String::as_str));
		parts.extend(self.ai_tags.iter().map(String::as_str));
		parts.extend(self.category.as_deref());
		parts.extend(self.ai_category.as_deref());

		if with_url {
			parts.push(&self.url);
		}

		parts.join(" ").to_lowercase()
	}
}

fn is_present(value: Option<&str>) -> bool {
	value.map(|value| !value.trim().is_empty()).unwrap_or(false)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
