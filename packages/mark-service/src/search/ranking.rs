use mark_domain::BookmarkRecord;

const TITLE_POINTS: u32 = 3;
const USER_TAG_POINTS: u32 = 2;
const TEXT_POINTS: u32 = 1;

/// Splits a query on whitespace and lowercases each term. Duplicate terms are kept and count once
/// each.
pub fn tokenize_query(query: &str) -> Vec<String> {
	query.split_whitespace().map(str::to_lowercase).filter(|term| !term.is_empty()).collect()
}

/// Field-weighted match strength of `terms` against `record`, in `[0, 1]`.
///
/// Each term earns the points of the strongest field it appears in: the title, then the user's own
/// tags (AI tags do not count here), then any other text field. The total is divided by the best
/// possible total. No terms means no preference, which scores 1.
pub fn relevance_score(record: &BookmarkRecord, terms: &[String]) -> f64 {
	if terms.is_empty() {
		return 1.0;
	}

	let title = record.title.to_lowercase();
	let user_tags = record.tags.iter().map(|tag| tag.to_lowercase()).collect::<Vec<_>>();
	let mut text: Option<String> = None;
	let mut points = 0_u32;

	for term in terms {
		points += if title.contains(term.as_str()) {
			TITLE_POINTS
		} else if user_tags.iter().any(|tag| tag.contains(term.as_str())) {
			USER_TAG_POINTS
		} else if text.get_or_insert_with(|| record.scoring_text()).contains(term.as_str()) {
			TEXT_POINTS
		} else {
			0
		};
	}

	let max_points = TITLE_POINTS as f64 * terms.len() as f64;

	if max_points <= 0.0 {
		return 1.0;
	}

	(points as f64 / max_points).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
	use crate::search::ranking::{relevance_score, tokenize_query};
	use mark_domain::BookmarkRecord;
	use mark_testkit::bookmark;

	fn record(title: &str, tags: &[&str], ai_tags: &[&str]) -> BookmarkRecord {
		bookmark("r", title)
			.url("https://unrelated.example/path")
			.description("A long description about state management.")
			.category("Development")
			.tags(tags)
			.ai_tags(ai_tags)
			.build()
	}

	#[test]
	fn tokenizer_lowercases_and_drops_blanks() {
		assert_eq!(tokenize_query("  React\tHOOKS \n"), vec!["react", "hooks"]);
		assert!(tokenize_query("   ").is_empty());
	}

	#[test]
	fn title_match_scores_full_marks() {
		let item = record("React Guide", &["react"], &[]);

		assert_eq!(relevance_score(&item, &tokenize_query("react")), 1.0);
	}

	#[test]
	fn field_weights_step_down_from_title_to_tags_to_text() {
		let item = record("Guide", &["frontend"], &["hooks"]);

		assert!((relevance_score(&item, &tokenize_query("front")) - 2.0 / 3.0).abs() < 1e-9);
		// AI tags are only searchable text, not user tags.
		assert!((relevance_score(&item, &tokenize_query("hooks")) - 1.0 / 3.0).abs() < 1e-9);
		assert!((relevance_score(&item, &tokenize_query("state")) - 1.0 / 3.0).abs() < 1e-9);
		assert_eq!(relevance_score(&item, &tokenize_query("cooking")), 0.0);
	}

	#[test]
	fn url_is_not_part_of_scoring_text() {
		let item = record("Guide", &[], &[]);

		assert_eq!(relevance_score(&item, &tokenize_query("unrelated")), 0.0);
	}

	#[test]
	fn score_averages_over_terms() {
		let item = record("React Guide", &[], &[]);
		let score = relevance_score(&item, &tokenize_query("react cooking"));

		assert!((score - 0.5).abs() < 1e-9);
	}

	#[test]
	fn empty_terms_are_neutral() {
		let item = record("Anything", &[], &[]);

		assert_eq!(relevance_score(&item, &[]), 1.0);
	}

	#[test]
	fn score_stays_in_unit_interval() {
		let item = record("react react", &["react"], &["react"]);

		for query in ["react", "react react react", "x y z", "re ac t"] {
			let score = relevance_score(&item, &tokenize_query(query));

			assert!((0.0..=1.0).contains(&score), "{query} scored {score}");
		}
	}
}
