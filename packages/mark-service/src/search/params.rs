//! Lenient conversion of loosely typed request input into [`SearchFilters`].
//!
//! Values that cannot be understood are dropped rather than rejected: a bad boolean, number or
//! date leaves its dimension unconstrained, and a bad limit or offset falls back to the default.

use std::collections::HashMap;

use serde_json::{Map, Value};
use time::{
	Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
	macros::format_description,
};

use crate::{
	Error, Result,
	search::{SearchFilters, SearchOptions, SortBy, SortOrder},
};
use mark_domain::SiteHealth;

impl SearchFilters {
	/// Reads filters from decoded query-string pairs. Lists are comma separated.
	pub fn from_query(params: &HashMap<String, String>, options: &SearchOptions) -> Self {
		parse(params, options)
	}

	/// Reads filters from a JSON request body. Lists may be arrays or comma-separated strings.
	pub fn from_json(value: &Value, options: &SearchOptions) -> Result<Self> {
		let Some(object) = value.as_object() else {
			return Err(Error::InvalidRequest {
				message: "Search filters must be a JSON object.".to_string(),
			});
		};

		Ok(parse(object, options))
	}
}

/// One raw input value, before coercion.
#[derive(Clone, Copy)]
enum Field<'a> {
	Text(&'a str),
	Json(&'a Value),
}
impl Field<'_> {
	fn text(self) -> Option<String> {
		match self {
			Self::Text(raw) => Some(raw.to_string()),
			Self::Json(Value::String(raw)) => Some(raw.clone()),
			Self::Json(Value::Number(number)) => Some(number.to_string()),
			Self::Json(_) => None,
		}
	}

	fn list(self) -> Vec<String> {
		match self {
			Self::Json(Value::Array(values)) =>
				values.iter().filter_map(|value| Field::Json(value).text()).collect(),
			other => other
				.text()
				.map(|raw| raw.split(',').map(str::to_string).collect())
				.unwrap_or_default(),
		}
	}

	fn boolean(self) -> Option<bool> {
		match self {
			Self::Json(Value::Bool(flag)) => Some(*flag),
			other => match other.text()?.trim().to_ascii_lowercase().as_str() {
				"true" | "1" | "yes" => Some(true),
				"false" | "0" | "no" => Some(false),
				_ => None,
			},
		}
	}

	/// Whole numbers; fractional input is truncated toward zero.
	fn integer(self) -> Option<i64> {
		let number = match self {
			Self::Json(Value::Number(number)) =>
				return number.as_i64().or_else(|| number.as_f64().and_then(truncate)),
			other => other.text()?,
		};
		let number = number.trim();

		number.parse::<i64>().ok().or_else(|| number.parse::<f64>().ok().and_then(truncate))
	}

	fn date(self) -> Option<OffsetDateTime> {
		parse_date(self.text()?.trim())
	}
}

/// Keyed access shared by query maps and JSON objects.
trait FieldSource {
	fn field(&self, key: &str) -> Option<Field<'_>>;

	/// First present key wins, so canonical names shadow their aliases.
	fn first(&self, keys: &[&str]) -> Option<Field<'_>> {
		keys.iter().find_map(|key| self.field(key))
	}
}
impl FieldSource for HashMap<String, String> {
	fn field(&self, key: &str) -> Option<Field<'_>> {
		self.get(key).map(|raw| Field::Text(raw))
	}
}
impl FieldSource for Map<String, Value> {
	fn field(&self, key: &str) -> Option<Field<'_>> {
		self.get(key).filter(|value| !value.is_null()).map(Field::Json)
	}
}

fn parse(source: &impl FieldSource, options: &SearchOptions) -> SearchFilters {
	let defaults = SearchFilters::default();
	let limit = match source.first(&["limit", "per_page"]).and_then(Field::integer) {
		Some(limit) if limit > 0 => u32::try_from(limit).unwrap_or(u32::MAX),
		_ => options.default_limit,
	};
	let offset = source
		.first(&["offset"])
		.and_then(Field::integer)
		.map(|offset| u32::try_from(offset.max(0)).unwrap_or(u32::MAX))
		.unwrap_or(defaults.offset);

	SearchFilters {
		query: source.first(&["query", "q"]).and_then(Field::text),
		categories: source.first(&["categories", "category"]).map(Field::list).unwrap_or_default(),
		tags: source.first(&["tags", "tag"]).map(Field::list).unwrap_or_default(),
		site_health: source
			.first(&["site_health"])
			.map(Field::list)
			.unwrap_or_default()
			.iter()
			.filter_map(|raw| SiteHealth::parse(raw))
			.collect(),
		date_from: source.first(&["date_from"]).and_then(Field::date),
		date_to: source.first(&["date_to"]).and_then(Field::date),
		has_notes: source.first(&["has_notes"]).and_then(Field::boolean),
		has_ai_summary: source.first(&["has_ai_summary"]).and_then(Field::boolean),
		min_visits: source.first(&["min_visits"]).and_then(Field::integer),
		max_visits: source.first(&["max_visits"]).and_then(Field::integer),
		sort_by: source
			.first(&["sort_by"])
			.and_then(Field::text)
			.map(|raw| SortBy::parse(&raw))
			.unwrap_or(defaults.sort_by),
		sort_order: source
			.first(&["sort_order"])
			.and_then(Field::text)
			.map(|raw| SortOrder::parse(&raw))
			.unwrap_or(defaults.sort_order),
		limit,
		offset,
	}
	.normalized(options)
}

/// RFC 3339 instants keep their offset; bare `YYYY-MM-DD` dates mean midnight UTC.
fn parse_date(raw: &str) -> Option<OffsetDateTime> {
	if raw.is_empty() {
		return None;
	}
	if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(instant);
	}

	Date::parse(raw, format_description!("[year]-[month]-[day]"))
		.ok()
		.map(|date| date.midnight().assume_offset(UtcOffset::UTC))
}

fn truncate(value: f64) -> Option<i64> {
	if !value.is_finite() || value < i64::MIN as f64 || value > i64::MAX as f64 {
		return None;
	}

	Some(value.trunc() as i64)
}
