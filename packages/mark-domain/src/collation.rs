//! Locale-insensitive title ordering.
//!
//! Titles are compared on a folded key first: compatibility decomposition, combining marks
//! stripped, lowercase. "Éclair", "eclair" and "ECLAIR" therefore sort next to each other instead
//! of by code point. Titles that fold to the same key are then ordered by their raw text.

use std::cmp::Ordering;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// A precomputed sort key for one title.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollationKey {
	folded: String,
	raw: String,
}
impl CollationKey {
	pub fn new(text: &str) -> Self {
		Self { folded: fold(text), raw: text.to_string() }
	}
}
impl Ord for CollationKey {
	fn cmp(&self, other: &Self) -> Ordering {
		self.folded.cmp(&other.folded).then_with(|| self.raw.cmp(&other.raw))
	}
}
impl PartialOrd for CollationKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

fn fold(text: &str) -> String {
	text.nfkd().filter(|ch| !is_combining_mark(*ch)).flat_map(char::to_lowercase).collect()
}
