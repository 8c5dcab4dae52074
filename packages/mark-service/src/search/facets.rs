use std::collections::HashSet;

use time::{Duration, OffsetDateTime};

use crate::search::{DateHistogram, FacetBucket, Facets};
use mark_domain::BookmarkRecord;

const LAST_WEEK_DAYS: i64 = 7;
const LAST_MONTH_DAYS: i64 = 30;
const LAST_YEAR_DAYS: i64 = 365;

/// Counts over the filtered set, before pagination.
pub(crate) fn aggregate(
	records: &[&BookmarkRecord],
	now: OffsetDateTime,
	max_tags: usize,
) -> Facets {
	let mut categories = Tally::default();
	let mut tags = Tally::default();
	let mut site_health = Tally::default();
	let mut date_ranges = DateHistogram::default();

	for record in records {
		let category = non_blank(record.category.as_deref());
		let ai_category = non_blank(record.ai_category.as_deref());

		if let Some(category) = category {
			categories.add(category);
		}
		// A record with two different categories lands in both buckets.
		if let Some(ai_category) = ai_category
			&& category != Some(ai_category)
		{
			categories.add(ai_category);
		}

		let mut seen = HashSet::new();

		for tag in record.all_tags() {
			if let Some(tag) = non_blank(Some(tag))
				&& seen.insert(tag)
			{
				tags.add(tag);
			}
		}

		site_health.add(record.site_health.as_str());
		date_ranges.record(now - record.created_at);
	}

	let mut tags = tags.into_buckets();

	tags.truncate(max_tags);

	Facets {
		categories: categories.into_buckets(),
		tags,
		site_health: site_health.into_buckets(),
		date_ranges,
	}
}

impl DateHistogram {
	/// Future timestamps have a negative age and count as last week.
	fn record(&mut self, age: Duration) {
		if age <= Duration::days(LAST_WEEK_DAYS) {
			self.last_week += 1;
		} else if age <= Duration::days(LAST_MONTH_DAYS) {
			self.last_month += 1;
		} else if age <= Duration::days(LAST_YEAR_DAYS) {
			self.last_year += 1;
		} else {
			self.older += 1;
		}
	}

	pub fn total(&self) -> usize {
		self.last_week + self.last_month + self.last_year + self.older
	}
}

/// Insertion-ordered counter.
#[derive(Default)]
struct Tally<'a> {
	buckets: Vec<(&'a str, usize)>,
}
impl<'a> Tally<'a> {
	fn add(&mut self, name: &'a str) {
		match self.buckets.iter_mut().find(|(seen, _)| *seen == name) {
			Some((_, count)) => *count += 1,
			None => self.buckets.push((name, 1)),
		}
	}

	/// Count descending; `sort_by` is stable so ties stay in first-seen order.
	fn into_buckets(mut self) -> Vec<FacetBucket> {
		self.buckets.sort_by(|(_, left), (_, right)| right.cmp(left));

		self.buckets
			.into_iter()
			.map(|(name, count)| FacetBucket { name: name.to_string(), count })
			.collect()
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}
