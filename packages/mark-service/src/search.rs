mod facets;
mod filter;
mod page;
mod params;
mod ranking;
mod sort;

pub use ranking::{relevance_score, tokenize_query};

use std::{
	any::Any,
	panic::{self, AssertUnwindSafe},
	time::Instant,
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, MarkService, Result};
use mark_domain::{BookmarkRecord, SiteHealth};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
	CreatedAt,
	UpdatedAt,
	Title,
	Visits,
	#[default]
	Relevance,
}
impl SortBy {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::CreatedAt => "created_at",
			Self::UpdatedAt => "updated_at",
			Self::Title => "title",
			Self::Visits => "visits",
			Self::Relevance => "relevance",
		}
	}

	/// Unrecognized keys fall back to `created_at`.
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"updated_at" => Self::UpdatedAt,
			"title" => Self::Title,
			"visits" => Self::Visits,
			"relevance" => Self::Relevance,
			_ => Self::CreatedAt,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
	Asc,
	#[default]
	Desc,
}
impl SortOrder {
	pub fn parse(raw: &str) -> Self {
		if raw.trim().eq_ignore_ascii_case("asc") { Self::Asc } else { Self::Desc }
	}
}

/// Strongly typed search parameters.
///
/// Empty lists and `None` leave the corresponding dimension unconstrained. Use
/// [`SearchFilters::from_query`] or [`SearchFilters::from_json`] to build one from loosely typed
/// request input.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SearchFilters {
	pub query: Option<String>,
	pub categories: Vec<String>,
	pub tags: Vec<String>,
	pub site_health: Vec<SiteHealth>,
	#[serde(with = "time::serde::rfc3339::option")]
	pub date_from: Option<OffsetDateTime>,
	/// Inclusive through the last millisecond of this instant's calendar day.
	#[serde(with = "time::serde::rfc3339::option")]
	pub date_to: Option<OffsetDateTime>,
	pub has_notes: Option<bool>,
	pub has_ai_summary: Option<bool>,
	pub min_visits: Option<i64>,
	pub max_visits: Option<i64>,
	pub sort_by: SortBy,
	pub sort_order: SortOrder,
	pub limit: u32,
	pub offset: u32,
}
impl SearchFilters {
	/// Canonical form: trimmed query (blank means absent), de-duplicated non-blank list values and
	/// a page size within `1..=max_limit`. A zero limit is replaced by the default.
	pub fn normalized(mut self, options: &SearchOptions) -> Self {
		self.query = self
			.query
			.map(|query| query.trim().to_string())
			.filter(|query| !query.is_empty());
		self.categories = clean_list(self.categories);
		self.tags = clean_list(self.tags);

		let mut site_health = Vec::with_capacity(self.site_health.len());

		for health in self.site_health {
			if !site_health.contains(&health) {
				site_health.push(health);
			}
		}

		self.site_health = site_health;

		if self.limit == 0 {
			self.limit = options.default_limit;
		}

		self.limit = self.limit.clamp(1, options.max_limit.max(1));

		self
	}
}
impl Default for SearchFilters {
	fn default() -> Self {
		Self {
			query: None,
			categories: Vec::new(),
			tags: Vec::new(),
			site_health: Vec::new(),
			date_from: None,
			date_to: None,
			has_notes: None,
			has_ai_summary: None,
			min_visits: None,
			max_visits: None,
			sort_by: SortBy::default(),
			sort_order: SortOrder::default(),
			limit: SearchOptions::DEFAULT_LIMIT,
			offset: 0,
		}
	}
}

/// Engine knobs sourced from the `[search]` config section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOptions {
	pub default_limit: u32,
	pub max_limit: u32,
	pub max_tag_facets: usize,
}
impl SearchOptions {
	pub const DEFAULT_LIMIT: u32 = 20;

	pub fn from_config(cfg: &mark_config::Search) -> Self {
		Self {
			default_limit: cfg.default_limit,
			max_limit: cfg.max_limit,
			max_tag_facets: cfg.max_tag_facets as usize,
		}
	}
}
impl Default for SearchOptions {
	fn default() -> Self {
		Self { default_limit: Self::DEFAULT_LIMIT, max_limit: 100, max_tag_facets: 50 }
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SearchRequest {
	pub scope: String,
	#[serde(default)]
	pub filters: SearchFilters,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchItem {
	#[serde(flatten)]
	pub bookmark: BookmarkRecord,
	/// Present only when the request carried a non-empty query.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relevance_score: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct FacetBucket {
	pub name: String,
	pub count: usize,
}

/// Mutually exclusive record-age buckets.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct DateHistogram {
	pub last_week: usize,
	pub last_month: usize,
	pub last_year: usize,
	pub older: usize,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Facets {
	pub categories: Vec<FacetBucket>,
	pub tags: Vec<FacetBucket>,
	pub site_health: Vec<FacetBucket>,
	pub date_ranges: DateHistogram,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct SearchError {
	pub code: String,
	pub message: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchResponse {
	pub success: bool,
	pub bookmarks: Vec<SearchItem>,
	pub total: usize,
	pub filtered: usize,
	pub page: u64,
	pub per_page: u32,
	pub total_pages: u32,
	pub filters_applied: SearchFilters,
	pub facets: Facets,
	pub search_time_ms: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<SearchError>,
}
impl SearchResponse {
	/// Empty envelope for a search that could not run. Nothing from a partial computation leaks in.
	pub fn failure(filters_applied: SearchFilters, err: &Error, search_time_ms: u64) -> Self {
		let pagination = page::Pagination::new(0, filters_applied.offset, filters_applied.limit);

		Self {
			success: false,
			bookmarks: Vec::new(),
			total: 0,
			filtered: 0,
			page: pagination.page,
			per_page: filters_applied.limit,
			total_pages: 0,
			filters_applied,
			facets: Facets::default(),
			search_time_ms,
			error: Some(SearchError { code: err.code().to_string(), message: err.to_string() }),
		}
	}
}

impl MarkService {
	/// Runs one search over a fresh snapshot of `req.scope`.
	///
	/// Never fails outright: scope, source and computation errors come back as an envelope with
	/// `success == false`, an error code and message, and the elapsed time.
	pub async fn search(&self, req: SearchRequest) -> SearchResponse {
		let started = Instant::now();
		let options = self.search_options();
		let filters = req.filters.normalized(&options);
		let scope = req.scope.trim();

		match self.try_search(scope, &filters, &options).await {
			Ok(mut response) => {
				response.search_time_ms = elapsed_ms(started);

				tracing::info!(
					scope,
					total = response.total,
					filtered = response.filtered,
					returned = response.bookmarks.len(),
					search_time_ms = response.search_time_ms,
					"Bookmark search completed."
				);

				response
			},
			Err(err) => {
				if matches!(err, Error::Internal { .. }) {
					tracing::error!(scope, error = %err, "Bookmark search failed.");
				} else {
					tracing::warn!(scope, error = %err, "Bookmark search failed.");
				}

				SearchResponse::failure(filters, &err, elapsed_ms(started))
			},
		}
	}

	async fn try_search(
		&self,
		scope: &str,
		filters: &SearchFilters,
		options: &SearchOptions,
	) -> Result<SearchResponse> {
		if scope.is_empty() {
			return Err(Error::InvalidRequest { message: "scope is required.".to_string() });
		}

		let records = self.source.fetch_all(scope).await?;
		let now = OffsetDateTime::now_utc();

		guarded(|| run(&records, filters, now, options))
	}
}

/// The search engine proper: a pure function of its arguments.
///
/// `now` anchors the date histogram. `search_time_ms` is left at zero for the caller to fill in.
pub fn run(
	records: &[BookmarkRecord],
	filters: &SearchFilters,
	now: OffsetDateTime,
	options: &SearchOptions,
) -> SearchResponse {
	let filters = filters.clone().normalized(options);
	let (filtered, impact) = filter::apply(records, &filters);

	tracing::debug!(
		candidate_count_pre = impact.candidate_count_pre,
		candidate_count_post = impact.candidate_count_post,
		dropped = ?impact.dropped_by_dimension,
		"Applied search filters."
	);

	let terms = filters.query.as_deref().map(tokenize_query);
	let ranked = filtered
		.iter()
		.map(|&record| sort::Ranked {
			record,
			relevance: terms.as_deref().map(|terms| relevance_score(record, terms)),
		})
		.collect::<Vec<_>>();
	let facets = facets::aggregate(&filtered, now, options.max_tag_facets);
	let sorted = sort::sort(ranked, filters.sort_by, filters.sort_order);
	let pagination = page::Pagination::new(sorted.len(), filters.offset, filters.limit);
	let bookmarks = sorted[pagination.window(sorted.len())]
		.iter()
		.map(|ranked| SearchItem {
			bookmark: ranked.record.clone(),
			relevance_score: ranked.relevance,
		})
		.collect();

	SearchResponse {
		success: true,
		bookmarks,
		total: records.len(),
		filtered: filtered.len(),
		page: pagination.page,
		per_page: filters.limit,
		total_pages: pagination.total_pages,
		filters_applied: filters,
		facets,
		search_time_ms: 0,
		error: None,
	}
}

fn clean_list(values: Vec<String>) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(values.len());

	for value in values {
		let trimmed = value.trim();

		if trimmed.is_empty() || out.iter().any(|existing| existing == trimmed) {
			continue;
		}

		out.push(trimmed.to_string());
	}

	out
}

/// Runs `compute`, turning a panic into [`Error::Internal`] so no partial result escapes.
fn guarded<T>(compute: impl FnOnce() -> T) -> Result<T> {
	panic::catch_unwind(AssertUnwindSafe(compute))
		.map_err(|payload| Error::Internal { message: panic_message(payload.as_ref()) })
}

fn elapsed_ms(started: Instant) -> u64 {
	u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		return (*message).to_string();
	}
	if let Some(message) = payload.downcast_ref::<String>() {
		return message.clone();
	}

	"unexpected panic during search.".to_string()
}

#[cfg(test)]
mod tests {
	use crate::{
		Error,
		search::{self, SearchFilters, SearchOptions, SearchResponse, SortBy, SortOrder},
	};
	use mark_domain::SiteHealth;

	#[test]
	fn sort_keys_parse_leniently() {
		assert_eq!(SortBy::parse("Title"), SortBy::Title);
		assert_eq!(SortBy::parse("relevance"), SortBy::Relevance);
		assert_eq!(SortBy::parse("popularity"), SortBy::CreatedAt);
		assert_eq!(SortOrder::parse("ASC"), SortOrder::Asc);
		assert_eq!(SortOrder::parse("sideways"), SortOrder::Desc);
	}

	#[test]
	fn defaults_sort_by_relevance_descending() {
		let filters = SearchFilters::default();

		assert_eq!(filters.sort_by, SortBy::Relevance);
		assert_eq!(filters.sort_order, SortOrder::Desc);
		assert_eq!(filters.limit, 20);
		assert_eq!(filters.offset, 0);
	}

	#[test]
	fn normalization_cleans_lists_and_clamps_limit() {
		let options = SearchOptions { default_limit: 20, max_limit: 50, max_tag_facets: 50 };
		let filters = SearchFilters {
			query: Some("   ".to_string()),
			tags: vec![" react ".to_string(), "".to_string(), "react".to_string()],
			site_health: vec![SiteHealth::Broken, SiteHealth::Broken],
			limit: 500,
			..SearchFilters::default()
		}
		.normalized(&options);

		assert_eq!(filters.query, None);
		assert_eq!(filters.tags, vec!["react".to_string()]);
		assert_eq!(filters.site_health, vec![SiteHealth::Broken]);
		assert_eq!(filters.limit, 50);

		let zero = SearchFilters { limit: 0, ..SearchFilters::default() }.normalized(&options);

		assert_eq!(zero.limit, 20);
	}

	#[test]
	fn guard_turns_panics_into_internal_errors() {
		let err = search::guarded(|| -> usize { panic!("facet bucket overflow") })
			.expect_err("Expected the panic to be caught.");

		match err {
			Error::Internal { message } => assert_eq!(message, "facet bucket overflow"),
			other => panic!("Unexpected error: {other}"),
		}

		let formatted = search::guarded(|| -> usize { panic!("bad offset {}", 7) })
			.expect_err("Expected the panic to be caught.");

		assert_eq!(formatted.to_string(), "Search failed: bad offset 7");
		assert_eq!(search::guarded(|| 42).expect("Failed to run guarded closure."), 42);
	}

	#[test]
	fn internal_failure_envelope_is_empty_and_timed() {
		let filters = SearchFilters { limit: 1, offset: u32::MAX, ..SearchFilters::default() };
		let err = Error::Internal { message: "boom".to_string() };
		let response = SearchResponse::failure(filters, &err, 12);
		let error = response.error.expect("Expected an error in the envelope.");

		assert!(!response.success);
		assert!(response.bookmarks.is_empty());
		assert_eq!((response.total, response.filtered, response.total_pages), (0, 0, 0));
		assert_eq!(response.page, u64::from(u32::MAX) + 1);
		assert_eq!(response.search_time_ms, 12);
		assert_eq!(error.code, "INTERNAL");
		assert_eq!(error.message, "Search failed: boom");
	}
}
