use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	/// Root of the on-disk library. Each scope owns `<data_dir>/<scope>/bookmarks.json`.
	pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// Page size used when a request omits `limit` or sends one that does not parse.
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	/// Upper bound applied to any requested page size.
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
	#[serde(default = "default_max_tag_facets")]
	pub max_tag_facets: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_limit: default_limit(),
			max_limit: default_max_limit(),
			max_tag_facets: default_max_tag_facets(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_limit() -> u32 {
	20
}

fn default_max_limit() -> u32 {
	100
}

fn default_max_tag_facets() -> u32 {
	50
}
