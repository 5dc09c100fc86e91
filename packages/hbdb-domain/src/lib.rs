//! Pure search and retrieval logic over an in-hand slice of posts.
//!
//! Nothing here performs I/O. Storage adapters hand posts in, the service layer takes the
//! projections out.

pub mod chronology;
pub mod model;
pub mod paging;
pub mod query;
pub mod similarity;
pub mod tag_index;
pub mod thread;

use std::fmt::{Display, Formatter};

/// Results per search page.
pub const PAGE_SIZE: usize = 10;
/// Length of the similar-posts list attached to an archive entry.
pub const SIMILAR_POSTS_LIMIT: usize = 15;

/// A request parameter that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
	pub field: &'static str,
	pub message: String,
}
impl InvalidField {
	pub fn new(field: &'static str, message: impl Into<String>) -> Self {
		Self { field, message: message.into() }
	}
}
impl Display for InvalidField {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.field, self.message)
	}
}

impl std::error::Error for InvalidField {}
