use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use hbdb_domain::{
	model::Post,
	paging::{self, Page},
	query::{SearchFilter, SortMode},
	tag_index,
};

use crate::{
	HbdbService, Result,
	cache::{self, SearchSet},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	#[serde(default)]
	pub keyword: String,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default = "default_page")]
	pub page: i64,
	#[serde(default = "default_sort_mode")]
	pub sort_mode: String,
}
impl Default for SearchRequest {
	fn default() -> Self {
		Self {
			keyword: String::new(),
			tags: Vec::new(),
			page: default_page(),
			sort_mode: default_sort_mode(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
	pub meta: SearchMeta,
	pub results: Vec<PostCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
	pub total_count: u64,
	pub tags: Vec<MetaTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTag {
	pub tag_name: String,
	pub count: u64,
}

/// Summary of one post as listed in search results and recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCard {
	pub post_id: i64,
	pub post_title: String,
	#[serde(with = "crate::time_serde")]
	pub post_date_gmt: OffsetDateTime,
	/// Tag names.
	pub tags: Vec<String>,
	pub count_likes: i64,
	pub count_dislikes: i64,
}
impl From<&Post> for PostCard {
	fn from(post: &Post) -> Self {
		Self {
			post_id: post.post_id,
			post_title: post.title.clone(),
			post_date_gmt: post.published_at,
			tags: post.tag_names(),
			count_likes: post.count_likes,
			count_dislikes: post.count_dislikes,
		}
	}
}

impl HbdbService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let filter = SearchFilter::parse(&req.keyword, &req.tags)?;
		let sort: SortMode = req.sort_mode.parse()?;
		let page = Page::new(req.page)?;
		let set = self.search_set(&filter, sort).await?;
		let results: Vec<PostCard> = page.slice(&set.posts).iter().map(PostCard::from).collect();

		tracing::info!(
			keyword_len = filter.keyword().chars().count(),
			tag_count = filter.tags().len(),
			sort_mode = sort.as_str(),
			page = page.index(),
			page_count = paging::page_count(set.total_count()),
			total_count = set.total_count(),
			returned = results.len(),
			"Search served."
		);

		Ok(SearchResponse {
			meta: SearchMeta {
				total_count: set.total_count(),
				tags: set
					.tags
					.iter()
					.map(|tag| MetaTag { tag_name: tag.tag_name.clone(), count: tag.count })
					.collect(),
			},
			results,
		})
	}

	async fn search_set(&self, filter: &SearchFilter, sort: SortMode) -> Result<Arc<SearchSet>> {
		if !self.cache.is_enabled() {
			return Ok(Arc::new(self.evaluate(filter, sort).await?));
		}

		let revision = self.corpus.revision().await?;
		let key = cache::search_cache_key(revision, filter, sort)?;

		if let Some(hit) = self.cache.get(revision, &key) {
			tracing::debug!(
				cache_key_prefix = cache::cache_key_prefix(&key),
				revision,
				hit = true,
				"Search cache lookup."
			);

			return Ok(hit);
		}

		tracing::debug!(
			cache_key_prefix = cache::cache_key_prefix(&key),
			revision,
			hit = false,
			"Search cache lookup."
		);

		let set = Arc::new(self.evaluate(filter, sort).await?);

		// A write during evaluation leaves the set's revision unknown, so it is served but not kept.
		if self.corpus.revision().await? == revision {
			self.cache.insert(revision, key, set.clone());
		}

		Ok(set)
	}

	async fn evaluate(&self, filter: &SearchFilter, sort: SortMode) -> Result<SearchSet> {
		let mut posts = self.corpus.find_posts(filter).await?;

		posts.retain(|post| filter.matches(post));
		sort.sort(&mut posts);

		let tags = tag_index::histogram(&posts);

		Ok(SearchSet { posts, tags })
	}
}

fn default_page() -> i64 {
	1
}

fn default_sort_mode() -> String {
	SortMode::TimeDesc.as_str().to_string()
}
