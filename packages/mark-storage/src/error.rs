#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Failed to read library at {path:?}.")]
	Io { path: std::path::PathBuf, source: std::io::Error },
	#[error("Library at {path:?} is corrupt: {source}")]
	Corrupt { path: std::path::PathBuf, source: serde_json::Error },
	/// Raised by remote record sources. The file and memory stores never return it.
	#[error("Record source unavailable: {0}")]
	Unavailable(String),
}
