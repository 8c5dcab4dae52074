use std::{future::Future, pin::Pin};

use mark_domain::BookmarkRecord;

use crate::{Error, Result};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Supplies the complete candidate set for one scope.
///
/// Implementations must hand each call a consistent snapshot. The search engine never narrows the
/// scope itself; whatever comes back here is the universe a search runs over.
pub trait RecordSource
where
	Self: Send + Sync,
{
	fn fetch_all<'a>(&'a self, scope: &'a str) -> BoxFuture<'a, Result<Vec<BookmarkRecord>>>;
}

/// Rejects scopes that could escape a per-scope namespace.
pub fn validate_scope(scope: &str) -> Result<&str> {
	let trimmed = scope.trim();

	if trimmed.is_empty() {
		return Err(Error::InvalidArgument("scope must be non-empty.".to_string()));
	}
	if trimmed == "." || trimmed.contains("..") || trimmed.contains(['/', '\\']) {
		return Err(Error::InvalidArgument(format!(
			"scope '{trimmed}' must not contain path separators or '..'."
		)));
	}

	Ok(trimmed)
}
