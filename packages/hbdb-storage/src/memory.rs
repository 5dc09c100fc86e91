//! A corpus held entirely in memory, loaded from a JSON snapshot or built in code.

use std::{
	future,
	path::Path,
	sync::{
		RwLock, RwLockReadGuard, RwLockWriteGuard,
		atomic::{AtomicU64, Ordering},
	},
};

use ahash::AHashMap;
use time::UtcOffset;

use hbdb_domain::{
	chronology,
	model::{Comment, Post, TagRef, TagUsage},
	query::SearchFilter,
};

use crate::{BoxFuture, CorpusStore, Error, PostLink, PostNeighbors, Result, snapshot::Snapshot};

pub struct MemoryCorpus {
	inner: RwLock<Inner>,
	revision: AtomicU64,
}
impl MemoryCorpus {
	pub fn new(tags: Vec<TagRef>, posts: Vec<Post>, comments: Vec<Comment>) -> Result<Self> {
		let mut inner =
			Inner { tags: AHashMap::new(), ordered: Vec::new(), by_id: AHashMap::new(), comments };

		for tag in tags {
			inner.insert_tag(tag)?;
		}
		for mut post in posts {
			normalize_post(&mut post);
			inner.check_tags(&post)?;

			if inner.by_id.insert(post.post_id, 0).is_some() {
				return Err(Error::Conflict(format!("Duplicate post id {}.", post.post_id)));
			}

			inner.ordered.push(post);
		}

		inner.reindex();

		Ok(Self { inner: RwLock::new(inner), revision: AtomicU64::new(1) })
	}

	pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
		let tags: Vec<TagRef> = snapshot
			.tags
			.into_iter()
			.map(|tag| TagRef { tag_id: tag.tag_id, tag_name: tag.tag_name })
			.collect();
		let names: AHashMap<i64, String> =
			tags.iter().map(|tag| (tag.tag_id, tag.tag_name.clone())).collect();
		let posts = snapshot
			.posts
			.into_iter()
			.map(|post| {
				let tags = post
					.tag_ids
					.iter()
					.filter_map(|tag_id| match names.get(tag_id) {
						Some(tag_name) =>
							Some(TagRef { tag_id: *tag_id, tag_name: tag_name.clone() }),
						None => {
							tracing::warn!(
								post_id = post.post_id,
								tag_id = *tag_id,
								"Skipping unknown tag on post."
							);

							None
						},
					})
					.collect();

				Post {
					post_id: post.post_id,
					title: post.post_title,
					content: post.post_content,
					published_at: post.post_date_gmt,
					count_likes: post.count_likes,
					count_dislikes: post.count_dislikes,
					tags,
				}
			})
			.collect();
		let comments = snapshot
			.comments
			.into_iter()
			.map(|comment| Comment {
				comment_id: comment.comment_id,
				post_id: comment.post_id,
				parent_comment_id: comment.parent_comment_id,
				author: comment.comment_author,
				content: comment.comment_content,
				created_at: comment.comment_date_gmt.to_offset(UtcOffset::UTC),
				count_likes: comment.count_likes,
				count_dislikes: comment.count_dislikes,
			})
			.collect();

		Self::new(tags, posts, comments)
	}

	pub fn load(path: &Path) -> Result<Self> {
		let corpus = Self::from_snapshot(Snapshot::read(path)?)?;

		tracing::info!(path = %path.display(), posts = corpus.post_count(), "Corpus snapshot loaded.");

		Ok(corpus)
	}

	pub fn post_count(&self) -> usize {
		self.read().ordered.len()
	}

	pub fn insert_tag(&self, tag: TagRef) -> Result<()> {
		self.write().insert_tag(tag)?;
		self.bump();

		Ok(())
	}

	/// Inserts a new post or replaces the one with the same id.
	pub fn upsert_post(&self, mut post: Post) -> Result<()> {
		normalize_post(&mut post);

		let mut inner = self.write();

		inner.check_tags(&post)?;

		match inner.by_id.get(&post.post_id).copied() {
			Some(index) => inner.ordered[index] = post,
			None => inner.ordered.push(post),
		}

		inner.reindex();
		drop(inner);
		self.bump();

		Ok(())
	}

	pub fn remove_post(&self, post_id: i64) -> Result<Post> {
		let mut inner = self.write();
		let Some(index) = inner.by_id.get(&post_id).copied() else {
			return Err(Error::NotFound(format!("Post {post_id} does not exist.")));
		};
		let post = inner.ordered.remove(index);

		inner.comments.retain(|comment| comment.post_id != post_id);
		inner.reindex();
		drop(inner);
		self.bump();

		Ok(post)
	}

	pub fn insert_comment(&self, mut comment: Comment) -> Result<()> {
		comment.created_at = comment.created_at.to_offset(UtcOffset::UTC);

		let mut inner = self.write();

		if !inner.by_id.contains_key(&comment.post_id) {
			return Err(Error::NotFound(format!("Post {} does not exist.", comment.post_id)));
		}
		if inner.comments.iter().any(|existing| existing.comment_id == comment.comment_id) {
			return Err(Error::Conflict(format!("Duplicate comment id {}.", comment.comment_id)));
		}

		inner.comments.push(comment);
		drop(inner);
		self.bump();

		Ok(())
	}

	fn bump(&self) {
		self.revision.fetch_add(1, Ordering::SeqCst);
	}

	fn read(&self) -> RwLockReadGuard<'_, Inner> {
		self.inner.read().unwrap_or_else(|err| err.into_inner())
	}

	fn write(&self) -> RwLockWriteGuard<'_, Inner> {
		self.inner.write().unwrap_or_else(|err| err.into_inner())
	}
}
impl CorpusStore for MemoryCorpus {
	fn revision(&self) -> BoxFuture<'_, Result<u64>> {
		Box::pin(future::ready(Ok(self.revision.load(Ordering::SeqCst))))
	}

	fn find_posts<'a>(&'a self, filter: &'a SearchFilter) -> BoxFuture<'a, Result<Vec<Post>>> {
		let posts: Vec<Post> =
			self.read().ordered.iter().filter(|post| filter.matches(post)).cloned().collect();

		Box::pin(future::ready(Ok(posts)))
	}

	fn fetch_post(&self, post_id: i64) -> BoxFuture<'_, Result<Option<Post>>> {
		let inner = self.read();
		let post = inner.by_id.get(&post_id).map(|index| inner.ordered[*index].clone());

		Box::pin(future::ready(Ok(post)))
	}

	fn neighbors<'a>(&'a self, subject: &'a Post) -> BoxFuture<'a, Result<PostNeighbors>> {
		let inner = self.read();
		let result = match chronology::neighbors(&inner.ordered, subject) {
			Some(found) => Ok(PostNeighbors {
				previous: found.previous.map(PostLink::from),
				next: found.next.map(PostLink::from),
			}),
			None => Err(Error::Inconsistent(format!(
				"Post {} is no longer in the chronological index.",
				subject.post_id
			))),
		};

		Box::pin(future::ready(result))
	}

	fn posts_sharing_tags<'a>(&'a self, tag_ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Post>>> {
		let posts: Vec<Post> = self
			.read()
			.ordered
			.iter()
			.filter(|post| tag_ids.iter().any(|tag_id| post.has_tag_id(*tag_id)))
			.cloned()
			.collect();

		Box::pin(future::ready(Ok(posts)))
	}

	fn latest_posts(&self, limit: usize) -> BoxFuture<'_, Result<Vec<Post>>> {
		let posts: Vec<Post> =
			chronology::most_recent(&self.read().ordered, limit).cloned().collect();

		Box::pin(future::ready(Ok(posts)))
	}

	fn tag_usage(&self) -> BoxFuture<'_, Result<Vec<TagUsage>>> {
		let inner = self.read();
		let mut counts: AHashMap<i64, u64> = AHashMap::with_capacity(inner.tags.len());

		for post in &inner.ordered {
			for tag in &post.tags {
				*counts.entry(tag.tag_id).or_insert(0) += 1;
			}
		}

		let usage: Vec<TagUsage> = inner
			.tags
			.iter()
			.map(|(tag_id, tag_name)| TagUsage {
				tag_id: *tag_id,
				tag_name: tag_name.clone(),
				count: counts.get(tag_id).copied().unwrap_or(0),
			})
			.collect();

		Box::pin(future::ready(Ok(usage)))
	}

	fn comments(&self, post_id: i64) -> BoxFuture<'_, Result<Vec<Comment>>> {
		let comments: Vec<Comment> = self
			.read()
			.comments
			.iter()
			.filter(|comment| comment.post_id == post_id)
			.cloned()
			.collect();

		Box::pin(future::ready(Ok(comments)))
	}
}

struct Inner {
	tags: AHashMap<i64, String>,
	/// Chronological order.
	ordered: Vec<Post>,
	/// Post id to index in `ordered`.
	by_id: AHashMap<i64, usize>,
	comments: Vec<Comment>,
}
impl Inner {
	fn insert_tag(&mut self, tag: TagRef) -> Result<()> {
		if self.tags.contains_key(&tag.tag_id) {
			return Err(Error::Conflict(format!("Duplicate tag id {}.", tag.tag_id)));
		}
		if self.tags.values().any(|name| name == &tag.tag_name) {
			return Err(Error::Conflict(format!("Duplicate tag name {:?}.", tag.tag_name)));
		}

		self.tags.insert(tag.tag_id, tag.tag_name);

		Ok(())
	}

	fn check_tags(&self, post: &Post) -> Result<()> {
		for tag in &post.tags {
			if self.tags.get(&tag.tag_id).is_none_or(|name| name != &tag.tag_name) {
				return Err(Error::InvalidArgument(format!(
					"Post {} references unknown tag {}.",
					post.post_id, tag.tag_id
				)));
			}
		}

		Ok(())
	}

	fn reindex(&mut self) {
		self.ordered.sort_by(chronology::chronological);
		self.by_id =
			self.ordered.iter().enumerate().map(|(index, post)| (post.post_id, index)).collect();
	}
}

fn normalize_post(post: &mut Post) {
	post.published_at = post.published_at.to_offset(UtcOffset::UTC);
	post.normalize_tags();
}
