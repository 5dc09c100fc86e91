//! Tag histograms over filtered post sets, and ordering of the corpus-wide tag catalogue.

use std::{cmp::Ordering, str::FromStr};

use ahash::AHashMap;

use crate::{
	InvalidField,
	model::{Post, TagUsage},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
	pub tag_name: String,
	pub count: u64,
}

/// Counts, for every tag carried by at least one post in `posts`, how many of those posts carry
/// it. Ordered by count descending, then name.
pub fn histogram<'a, I>(posts: I) -> Vec<TagCount>
where
	I: IntoIterator<Item = &'a Post>,
{
	let mut counts: AHashMap<&'a str, u64> = AHashMap::new();

	for post in posts {
		for (index, tag) in post.tags.iter().enumerate() {
			// Two ids may share a display name; count the post once per name.
			if post.tags[..index].iter().any(|earlier| earlier.tag_name == tag.tag_name) {
				continue;
			}

			*counts.entry(tag.tag_name.as_str()).or_insert(0) += 1;
		}
	}

	let mut out: Vec<TagCount> = counts
		.into_iter()
		.map(|(tag_name, count)| TagCount { tag_name: tag_name.to_string(), count })
		.collect();

	out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag_name.cmp(&b.tag_name)));

	out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagSort {
	#[default]
	Count,
	Name,
}
impl TagSort {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Count => "count",
			Self::Name => "name",
		}
	}

	pub fn compare(self, a: &TagUsage, b: &TagUsage) -> Ordering {
		match self {
			Self::Count => b
				.count
				.cmp(&a.count)
				.then_with(|| a.tag_name.cmp(&b.tag_name))
				.then_with(|| a.tag_id.cmp(&b.tag_id)),
			Self::Name => a.tag_name.cmp(&b.tag_name).then_with(|| a.tag_id.cmp(&b.tag_id)),
		}
	}

	pub fn sort(self, tags: &mut [TagUsage]) {
		tags.sort_by(|a, b| self.compare(a, b));
	}
}
impl FromStr for TagSort {
	type Err = InvalidField;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"count" => Ok(Self::Count),
			"name" => Ok(Self::Name),
			other => Err(InvalidField::new(
				"sort",
				format!("unknown tag sort '{other}', expected one of count, name."),
			)),
		}
	}
}
