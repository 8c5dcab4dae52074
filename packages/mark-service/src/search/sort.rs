use std::cmp::Ordering;

use time::OffsetDateTime;

use crate::search::{SortBy, SortOrder};
use mark_domain::{BookmarkRecord, collation::CollationKey};

/// A filtered record together with its memoized relevance score.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ranked<'a> {
	pub(crate) record: &'a BookmarkRecord,
	pub(crate) relevance: Option<f64>,
}

#[derive(Debug)]
enum SortKey {
	Title(CollationKey),
	Timestamp(OffsetDateTime),
	Visits(u64),
	Score(f64),
}
impl SortKey {
	fn of(ranked: &Ranked<'_>, sort_by: SortBy) -> Self {
		match sort_by {
			SortBy::Title => Self::Title(CollationKey::new(&ranked.record.title)),
			SortBy::CreatedAt => Self::Timestamp(ranked.record.created_at),
			SortBy::UpdatedAt => Self::Timestamp(ranked.record.updated_at),
			SortBy::Visits => Self::Visits(ranked.record.visits),
			// Without a query every record is equally relevant.
			SortBy::Relevance => Self::Score(ranked.relevance.unwrap_or(1.0)),
		}
	}

	fn ascending(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Self::Title(left), Self::Title(right)) => left.cmp(right),
			(Self::Timestamp(left), Self::Timestamp(right)) => left.cmp(right),
			(Self::Visits(left), Self::Visits(right)) => left.cmp(right),
			(Self::Score(left), Self::Score(right)) => left.total_cmp(right),
			_ => Ordering::Equal,
		}
	}
}

/// Stable sort on keys computed once per record. Equal keys keep their filtered order in both
/// directions.
pub(crate) fn sort<'a>(
	items: Vec<Ranked<'a>>,
	sort_by: SortBy,
	order: SortOrder,
) -> Vec<Ranked<'a>> {
	let mut keyed =
		items.into_iter().map(|item| (SortKey::of(&item, sort_by), item)).collect::<Vec<_>>();

	keyed.sort_by(|(left, _), (right, _)| {
		let ord = left.ascending(right);

		match order {
			SortOrder::Asc => ord,
			SortOrder::Desc => ord.reverse(),
		}
	});

	keyed.into_iter().map(|(_, item)| item).collect()
}
