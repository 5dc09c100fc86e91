use std::{future::Future, pin::Pin};

use hbdb_domain::{
	model::{Comment, Post, TagUsage},
	query::SearchFilter,
};

use crate::Result;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Minimal projection used for previous/next navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLink {
	pub post_id: i64,
	pub title: String,
}
impl From<&Post> for PostLink {
	fn from(post: &Post) -> Self {
		Self { post_id: post.post_id, title: post.title.clone() }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostNeighbors {
	pub previous: Option<PostLink>,
	pub next: Option<PostLink>,
}

/// Read primitives the search and archive services need from a post corpus.
///
/// Every post handed out has its tags sorted by id. Implementations never mutate the corpus
/// through this trait.
pub trait CorpusStore
where
	Self: Send + Sync,
{
	/// Changes whenever the corpus is written. Equal revisions imply equal corpus content.
	fn revision(&self) -> BoxFuture<'_, Result<u64>>;

	/// Posts that may match `filter`, in no particular order.
	///
	/// The result must include every post `filter.matches` accepts. It may include extra posts;
	/// callers re-check the filter.
	fn find_posts<'a>(&'a self, filter: &'a SearchFilter) -> BoxFuture<'a, Result<Vec<Post>>>;

	fn fetch_post(&self, post_id: i64) -> BoxFuture<'_, Result<Option<Post>>>;

	/// Immediate neighbors of `subject` in the corpus-wide chronological order.
	fn neighbors<'a>(&'a self, subject: &'a Post) -> BoxFuture<'a, Result<PostNeighbors>>;

	/// Every post carrying at least one of `tag_ids`.
	fn posts_sharing_tags<'a>(&'a self, tag_ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Post>>>;

	/// The `limit` newest posts, newest first.
	fn latest_posts(&self, limit: usize) -> BoxFuture<'_, Result<Vec<Post>>>;

	/// Every known tag with its corpus-wide usage count, unordered.
	fn tag_usage(&self) -> BoxFuture<'_, Result<Vec<TagUsage>>>;

	fn comments(&self, post_id: i64) -> BoxFuture<'_, Result<Vec<Comment>>>;
}
