use std::collections::HashSet;

use time::{OffsetDateTime, macros::time};

use crate::search::SearchFilters;
use mark_domain::{BookmarkRecord, SiteHealth};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FilterDimension {
	Visits,
	SiteHealth,
	DateRange,
	Notes,
	AiSummary,
	Category,
	Tag,
	Query,
}
impl FilterDimension {
	pub(crate) fn as_str(self) -> &'static str {
		match self {
			Self::Visits => "visits",
			Self::SiteHealth => "site_health",
			Self::DateRange => "date_range",
			Self::Notes => "has_notes",
			Self::AiSummary => "has_ai_summary",
			Self::Category => "categories",
			Self::Tag => "tags",
			Self::Query => "query",
		}
	}
}

/// How many records each dimension rejected. A record is charged to the first dimension that
/// rejected it.
#[derive(Clone, Debug, Default)]
pub(crate) struct FilterImpact {
	pub(crate) candidate_count_pre: usize,
	pub(crate) candidate_count_post: usize,
	pub(crate) dropped_by_dimension: Vec<(&'static str, usize)>,
}

/// Keeps the records that pass every active dimension, in their original order.
pub(crate) fn apply<'a>(
	records: &'a [BookmarkRecord],
	filters: &SearchFilters,
) -> (Vec<&'a BookmarkRecord>, FilterImpact) {
	let predicate = Predicate::new(filters);
	let mut kept = Vec::with_capacity(records.len());
	let mut dropped: Vec<(FilterDimension, usize)> = Vec::new();

	for record in records {
		match predicate.evaluate(record) {
			Ok(()) => kept.push(record),
			Err(dimension) => match dropped.iter_mut().find(|(seen, _)| *seen == dimension) {
				Some((_, count)) => *count += 1,
				None => dropped.push((dimension, 1)),
			},
		}
	}

	let impact = FilterImpact {
		candidate_count_pre: records.len(),
		candidate_count_post: kept.len(),
		dropped_by_dimension: dropped
			.into_iter()
			.map(|(dimension, count)| (dimension.as_str(), count))
			.collect(),
	};

	(kept, impact)
}

/// `date_to` covers the whole calendar day it falls on.
pub(crate) fn end_of_day(value: OffsetDateTime) -> OffsetDateTime {
	value.replace_time(time!(23:59:59.999))
}

struct Predicate<'f> {
	query: Option<String>,
	categories: HashSet<&'f str>,
	tags: HashSet<&'f str>,
	site_health: &'f [SiteHealth],
	date_from: Option<OffsetDateTime>,
	date_to: Option<OffsetDateTime>,
	has_notes: Option<bool>,
	has_ai_summary: Option<bool>,
	min_visits: Option<i64>,
	max_visits: Option<i64>,
}
impl<'f> Predicate<'f> {
	fn new(filters: &'f SearchFilters) -> Self {
		Self {
			query: filters
				.query
				.as_deref()
				.map(str::trim)
				.filter(|query| !query.is_empty())
				.map(str::to_lowercase),
			categories: filters.categories.iter().map(String::as_str).collect(),
			tags: filters.tags.iter().map(String::as_str).collect(),
			site_health: &filters.site_health,
			date_from: filters.date_from,
			date_to: filters.date_to.map(end_of_day),
			has_notes: filters.has_notes,
			has_ai_summary: filters.has_ai_summary,
			min_visits: filters.min_visits,
			max_visits: filters.max_visits,
		}
	}

	/// Cheap scalar checks run first; the text scan runs last.
	fn evaluate(&self, record: &BookmarkRecord) -> Result<(), FilterDimension> {
		if !self.visits_match(record) {
			return Err(FilterDimension::Visits);
		}
		if !self.site_health.is_empty() && !self.site_health.contains(&record.site_health) {
			return Err(FilterDimension::SiteHealth);
		}
		if !self.date_match(record) {
			return Err(FilterDimension::DateRange);
		}
		if self.has_notes.is_some_and(|wanted| record.has_notes() != wanted) {
			return Err(FilterDimension::Notes);
		}
		if self.has_ai_summary.is_some_and(|wanted| record.has_ai_summary() != wanted) {
			return Err(FilterDimension::AiSummary);
		}
		if !self.category_match(record) {
			return Err(FilterDimension::Category);
		}
		if !self.tags.is_empty() && !record.all_tags().any(|tag| self.tags.contains(tag)) {
			return Err(FilterDimension::Tag);
		}
		if let Some(query) = self.query.as_deref()
			&& !record.filter_text().contains(query)
		{
			return Err(FilterDimension::Query);
		}

		Ok(())
	}

	fn visits_match(&self, record: &BookmarkRecord) -> bool {
		let visits = i64::try_from(record.visits).unwrap_or(i64::MAX);

		self.min_visits.is_none_or(|min| visits >= min)
			&& self.max_visits.is_none_or(|max| visits <= max)
	}

	fn date_match(&self, record: &BookmarkRecord) -> bool {
		self.date_from.is_none_or(|from| record.created_at >= from)
			&& self.date_to.is_none_or(|to| record.created_at <= to)
	}

	fn category_match(&self, record: &BookmarkRecord) -> bool {
		if self.categories.is_empty() {
			return true;
		}

		[record.category.as_deref(), record.ai_category.as_deref()]
			.into_iter()
			.flatten()
			.any(|category| self.categories.contains(category))
	}
}
