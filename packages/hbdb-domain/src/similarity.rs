//! Tag-overlap recommendations.
//!
//! Candidates are ranked by the number of tags they share with the subject. Equal overlap is
//! broken most-recent-first by the corpus order (publication time, then id, both descending).
//! When fewer than `limit` posts share a tag, the list is padded with the newest remaining posts.

use ahash::AHashSet;

use crate::{chronology, model::Post};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarPost<'a> {
	pub post: &'a Post,
	pub shared_tags: usize,
}

pub fn shared_tag_count(subject: &Post, other: &Post) -> usize {
	other.tags.iter().filter(|tag| subject.has_tag_id(tag.tag_id)).count()
}

/// Ranks `candidates` against `subject` and pads from `recent`.
///
/// `candidates` must contain every post sharing at least one tag with `subject`; `recent` must
/// contain at least the `limit + 1` newest posts of the corpus. Either may contain the subject
/// or duplicates; both are skipped.
pub fn rank_similar<'a>(
	subject: &Post,
	candidates: &'a [Post],
	recent: &'a [Post],
	limit: usize,
) -> Vec<SimilarPost<'a>> {
	let mut seen: AHashSet<i64> = AHashSet::with_capacity(candidates.len() + 1);

	seen.insert(subject.post_id);

	let mut ranked: Vec<SimilarPost<'a>> = candidates
		.iter()
		.filter(|post| seen.insert(post.post_id))
		.map(|post| SimilarPost { post, shared_tags: shared_tag_count(subject, post) })
		.filter(|similar| similar.shared_tags > 0)
		.collect();

	ranked.sort_by(|a, b| {
		b.shared_tags
			.cmp(&a.shared_tags)
			.then_with(|| chronology::chronological(b.post, a.post))
	});
	ranked.truncate(limit);

	if ranked.len() == limit {
		return ranked;
	}

	let mut kept: AHashSet<i64> = ranked.iter().map(|similar| similar.post.post_id).collect();

	kept.insert(subject.post_id);

	let mut padding: Vec<&'a Post> = recent.iter().collect();

	padding.sort_by(|a, b| chronology::chronological(b, a));

	for post in padding {
		if ranked.len() == limit {
			break;
		}
		if !kept.insert(post.post_id) {
			continue;
		}

		ranked.push(SimilarPost { post, shared_tags: shared_tag_count(subject, post) });
	}

	ranked
}
