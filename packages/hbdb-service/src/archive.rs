use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use hbdb_domain::{SIMILAR_POSTS_LIMIT, similarity};
use hbdb_storage::PostLink;

use crate::{Error, HbdbService, PostCard, Result};

/// Full detail of one post with its chronological neighbors and recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
	pub post_id: i64,
	pub post_title: String,
	pub tags: Vec<ArchiveTag>,
	pub count_likes: i64,
	pub count_dislikes: i64,
	#[serde(with = "crate::time_serde")]
	pub post_date_gmt: OffsetDateTime,
	pub post_content: String,
	pub similar_posts: Vec<PostCard>,
	pub previous_post: Option<PostLinkView>,
	pub next_post: Option<PostLinkView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveTag {
	pub tag_name: String,
	pub tag_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLinkView {
	pub post_id: i64,
	pub post_title: String,
}
impl From<PostLink> for PostLinkView {
	fn from(link: PostLink) -> Self {
		Self { post_id: link.post_id, post_title: link.title }
	}
}

impl HbdbService {
	/// Resolves one post with its neighbors and similar posts.
	///
	/// Every read must observe the same corpus revision. A write between the reads fails the
	/// request with [`Error::Storage`] instead of mixing two corpus states.
	pub async fn get_data(&self, post_id: i64) -> Result<ArchiveEntry> {
		let revision = self.corpus.revision().await?;
		let Some(post) = self.corpus.fetch_post(post_id).await? else {
			return Err(Error::NotFound { message: format!("Post {post_id} does not exist.") });
		};
		let neighbors = self.corpus.neighbors(&post).await?;
		let tag_ids: Vec<i64> = post.tags.iter().map(|tag| tag.tag_id).collect();
		let candidates = self.corpus.posts_sharing_tags(&tag_ids).await?;
		let recent = self.corpus.latest_posts(SIMILAR_POSTS_LIMIT + 1).await?;
		let observed = self.corpus.revision().await?;

		if observed != revision {
			tracing::warn!(
				post_id,
				revision,
				observed,
				"Corpus changed while resolving an archive entry."
			);

			return Err(Error::Storage {
				message: format!(
					"Corpus changed from revision {revision} to {observed} while resolving post {post_id}."
				),
			});
		}

		let similar_posts: Vec<PostCard> =
			similarity::rank_similar(&post, &candidates, &recent, SIMILAR_POSTS_LIMIT)
				.into_iter()
				.map(|similar| PostCard::from(similar.post))
				.collect();

		tracing::info!(
			post_id,
			candidates = candidates.len(),
			similar = similar_posts.len(),
			has_previous = neighbors.previous.is_some(),
			has_next = neighbors.next.is_some(),
			"Archive entry resolved."
		);

		Ok(ArchiveEntry {
			post_id: post.post_id,
			tags: post
				.tags
				.iter()
				.map(|tag| ArchiveTag { tag_name: tag.tag_name.clone(), tag_id: tag.tag_id })
				.collect(),
			count_likes: post.count_likes,
			count_dislikes: post.count_dislikes,
			post_date_gmt: post.published_at,
			similar_posts,
			previous_post: neighbors.previous.map(PostLinkView::from),
			next_post: neighbors.next.map(PostLinkView::from),
			post_title: post.title,
			post_content: post.content,
		})
	}
}
