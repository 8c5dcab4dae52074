pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Record source unavailable: {message}")]
	SourceUnavailable { message: String },
	#[error("Search failed: {message}")]
	Internal { message: String },
}
impl Error {
	/// Stable machine-readable code carried in failed search envelopes.
	pub fn code(&self) -> &'static str {
		match self {
			Self::InvalidRequest { .. } => "INVALID_REQUEST",
			Self::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
			Self::Internal { .. } => "INTERNAL",
		}
	}
}
impl From<mark_storage::Error> for Error {
	fn from(err: mark_storage::Error) -> Self {
		match err {
			mark_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			mark_storage::Error::Unavailable(message) => Self::SourceUnavailable { message },
			other => Self::SourceUnavailable { message: other.to_string() },
		}
	}
}
