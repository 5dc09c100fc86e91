use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
	pub tag_id: i64,
	pub tag_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
	pub post_id: i64,
	pub title: String,
	pub content: String,
	/// Publication time, always UTC.
	pub published_at: OffsetDateTime,
	pub count_likes: i64,
	pub count_dislikes: i64,
	/// Unique by `tag_id`, sorted by `tag_id`.
	pub tags: Vec<TagRef>,
}
impl Post {
	/// Sorts and deduplicates `tags` so the struct upholds its invariant.
	pub fn normalize_tags(&mut self) {
		self.tags.sort_by_key(|tag| tag.tag_id);
		self.tags.dedup_by_key(|tag| tag.tag_id);
	}

	pub fn has_tag_named(&self, name: &str) -> bool {
		self.tags.iter().any(|tag| tag.tag_name == name)
	}

	pub fn has_tag_id(&self, tag_id: i64) -> bool {
		self.tags.binary_search_by_key(&tag_id, |tag| tag.tag_id).is_ok()
	}

	pub fn tag_names(&self) -> Vec<String> {
		self.tags.iter().map(|tag| tag.tag_name.clone()).collect()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
	pub comment_id: i64,
	pub post_id: i64,
	pub parent_comment_id: Option<i64>,
	pub author: String,
	pub content: String,
	pub created_at: OffsetDateTime,
	pub count_likes: i64,
	pub count_dislikes: i64,
}

/// Corpus-wide usage of one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUsage {
	pub tag_id: i64,
	pub tag_name: String,
	pub count: u64,
}
