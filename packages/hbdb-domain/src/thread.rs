//! Arranges a post's flat comment list into display order with nesting depth.

use ahash::{AHashMap, AHashSet};

use crate::model::Comment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadedComment<'a> {
	pub comment: &'a Comment,
	/// 0 for top-level comments.
	pub level: usize,
}

/// Depth-first order: top-level comments oldest first, each followed by its replies.
///
/// A comment whose parent is not in `comments` is shown at the top level. Every comment is
/// emitted exactly once, even when parent links form a cycle.
pub fn thread(comments: &[Comment]) -> Vec<ThreadedComment<'_>> {
	let ids: AHashSet<i64> = comments.iter().map(|comment| comment.comment_id).collect();
	let mut children: AHashMap<i64, Vec<&Comment>> = AHashMap::new();
	let mut roots: Vec<&Comment> = Vec::new();

	for comment in comments {
		match comment.parent_comment_id {
			Some(parent) if parent != comment.comment_id && ids.contains(&parent) =>
				children.entry(parent).or_default().push(comment),
			_ => roots.push(comment),
		}
	}

	roots.sort_by(|a, b| display_order(a, b));

	for replies in children.values_mut() {
		replies.sort_by(|a, b| display_order(a, b));
	}

	let mut out = Vec::with_capacity(comments.len());
	let mut emitted: AHashSet<i64> = AHashSet::with_capacity(comments.len());

	for root in roots {
		walk(root, &children, &mut emitted, &mut out);
	}

	if out.len() < comments.len() {
		// Only cycles are left. Enter each at its oldest member.
		let mut stranded: Vec<&Comment> =
			comments.iter().filter(|comment| !emitted.contains(&comment.comment_id)).collect();

		stranded.sort_by(|a, b| display_order(a, b));

		for comment in stranded {
			walk(comment, &children, &mut emitted, &mut out);
		}
	}

	out
}

fn walk<'a>(
	root: &'a Comment,
	children: &AHashMap<i64, Vec<&'a Comment>>,
	emitted: &mut AHashSet<i64>,
	out: &mut Vec<ThreadedComment<'a>>,
) {
	let mut stack = vec![(root, 0_usize)];

	while let Some((comment, level)) = stack.pop() {
		if !emitted.insert(comment.comment_id) {
			continue;
		}

		out.push(ThreadedComment { comment, level });

		if let Some(replies) = children.get(&comment.comment_id) {
			for reply in replies.iter().rev() {
				stack.push((*reply, level + 1));
			}
		}
	}
}

fn display_order(a: &Comment, b: &Comment) -> std::cmp::Ordering {
	a.created_at.cmp(&b.created_at).then_with(|| a.comment_id.cmp(&b.comment_id))
}
