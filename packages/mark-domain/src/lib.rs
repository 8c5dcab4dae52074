pub mod bookmark;
pub mod collation;

pub use bookmark::{BookmarkRecord, SiteHealth};
