//! The corpus-wide total order: publication time, then post id.

use std::cmp::Ordering;

use crate::model::Post;

pub fn chronological(a: &Post, b: &Post) -> Ordering {
	a.published_at.cmp(&b.published_at).then_with(|| a.post_id.cmp(&b.post_id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors<'a> {
	pub previous: Option<&'a Post>,
	pub next: Option<&'a Post>,
}

/// Finds the neighbors of `subject` in `ordered`, which must already be in chronological order.
///
/// Returns `None` when `subject` is not part of `ordered`.
pub fn neighbors<'a>(ordered: &'a [Post], subject: &Post) -> Option<Neighbors<'a>> {
	let index = ordered.binary_search_by(|probe| chronological(probe, subject)).ok()?;

	Some(Neighbors {
		previous: index.checked_sub(1).and_then(|i| ordered.get(i)),
		next: ordered.get(index + 1),
	})
}

/// The `count` newest posts, newest first.
pub fn most_recent(ordered: &[Post], count: usize) -> impl Iterator<Item = &Post> {
	ordered.iter().rev().take(count)
}
