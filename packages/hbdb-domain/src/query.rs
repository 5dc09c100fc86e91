use std::{cmp::Ordering, fmt::Display, str::FromStr};

use crate::{InvalidField, chronology, model::Post};

pub const MAX_KEYWORD_CHARS: usize = 200;
pub const MAX_FILTER_TAGS: usize = 32;

/// Keyword and tag constraints of one search, already validated.
///
/// The keyword matches case-insensitively as a substring of the title or the content. The tag
/// list is conjunctive: a post must carry every requested tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
	keyword: String,
	folded_keyword: String,
	tags: Vec<String>,
}
impl SearchFilter {
	pub fn parse(keyword: &str, tags: &[String]) -> Result<Self, InvalidField> {
		let keyword = keyword.trim();

		if keyword.chars().count() > MAX_KEYWORD_CHARS {
			return Err(InvalidField::new(
				"keyword",
				format!("keyword must be at most {MAX_KEYWORD_CHARS} characters."),
			));
		}
		if keyword.chars().any(char::is_control) {
			return Err(InvalidField::new("keyword", "keyword must not contain control characters."));
		}
		if tags.len() > MAX_FILTER_TAGS {
			return Err(InvalidField::new(
				"tags",
				format!("at most {MAX_FILTER_TAGS} tags may be requested."),
			));
		}

		let mut normalized: Vec<String> = Vec::with_capacity(tags.len());

		for tag in tags {
			let tag = tag.trim();

			if tag.is_empty() {
				return Err(InvalidField::new("tags", "tag names must be non-empty."));
			}
			if tag.chars().any(char::is_control) {
				return Err(InvalidField::new("tags", "tag names must not contain control characters."));
			}
			if !normalized.iter().any(|existing| existing == tag) {
				normalized.push(tag.to_string());
			}
		}

		normalized.sort();

		Ok(Self {
			keyword: keyword.to_string(),
			folded_keyword: fold_case(keyword),
			tags: normalized,
		})
	}

	/// Filter that accepts every post.
	pub fn all() -> Self {
		Self { keyword: String::new(), folded_keyword: String::new(), tags: Vec::new() }
	}

	pub fn keyword(&self) -> &str {
		&self.keyword
	}

	/// Requested tag names, deduplicated and sorted.
	pub fn tags(&self) -> &[String] {
		&self.tags
	}

	pub fn is_unrestricted(&self) -> bool {
		self.keyword.is_empty() && self.tags.is_empty()
	}

	pub fn matches(&self, post: &Post) -> bool {
		self.matches_tags(post) && self.matches_keyword(post)
	}

	pub fn matches_keyword(&self, post: &Post) -> bool {
		if self.folded_keyword.is_empty() {
			return true;
		}

		fold_case(&post.title).contains(&self.folded_keyword)
			|| fold_case(&post.content).contains(&self.folded_keyword)
	}

	pub fn matches_tags(&self, post: &Post) -> bool {
		self.tags.iter().all(|tag| post.has_tag_named(tag))
	}
}

/// Case folding used for keyword containment. Caseless scripts pass through unchanged.
///
/// Each char folds on its own, so a final `Σ` folds to `σ` exactly as it does mid-word.
pub fn fold_case(text: &str) -> String {
	text.chars().flat_map(char::to_lowercase).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortMode {
	TimeAsc,
	TimeDesc,
	LikeDesc,
}
impl SortMode {
	pub const ALL: [SortMode; 3] = [Self::TimeAsc, Self::TimeDesc, Self::LikeDesc];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::TimeAsc => "timeAsc",
			Self::TimeDesc => "timeDesc",
			Self::LikeDesc => "likeDesc",
		}
	}

	pub fn compare(self, a: &Post, b: &Post) -> Ordering {
		match self {
			Self::TimeAsc => chronology::chronological(a, b),
			Self::TimeDesc => chronology::chronological(b, a),
			Self::LikeDesc => b
				.count_likes
				.cmp(&a.count_likes)
				.then_with(|| chronology::chronological(b, a)),
		}
	}

	pub fn sort(self, posts: &mut [Post]) {
		posts.sort_by(|a, b| self.compare(a, b));
	}
}
impl FromStr for SortMode {
	type Err = InvalidField;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|mode| mode.as_str() == raw).ok_or_else(|| {
			let expected = Self::ALL.map(Self::as_str).join(", ");

			InvalidField::new(
				"sortMode",
				format!("unknown sort mode '{raw}', expected one of {expected}."),
			)
		})
	}
}
impl Display for SortMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
