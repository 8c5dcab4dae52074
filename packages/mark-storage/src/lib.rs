pub mod file;
pub mod memory;
pub mod source;

mod error;

pub use error::Error;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use source::{BoxFuture, RecordSource};

pub type Result<T, E = Error> = std::result::Result<T, E>;
