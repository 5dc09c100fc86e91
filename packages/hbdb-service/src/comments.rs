use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use hbdb_domain::thread::{self, ThreadedComment};

use crate::{Error, HbdbService, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThreadResponse {
	pub comments: Vec<CommentNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
	pub comment_id: i64,
	pub post_id: i64,
	pub parent_comment_id: Option<i64>,
	pub comment_author: String,
	pub comment_content: String,
	#[serde(with = "crate::time_serde")]
	pub comment_date_gmt: OffsetDateTime,
	pub count_likes: i64,
	pub count_dislikes: i64,
	/// Nesting depth, 0 for top-level comments.
	pub level: usize,
}
impl From<ThreadedComment<'_>> for CommentNode {
	fn from(threaded: ThreadedComment<'_>) -> Self {
		let comment = threaded.comment;

		Self {
			comment_id: comment.comment_id,
			post_id: comment.post_id,
			parent_comment_id: comment.parent_comment_id,
			comment_author: comment.author.clone(),
			comment_content: comment.content.clone(),
			comment_date_gmt: comment.created_at,
			count_likes: comment.count_likes,
			count_dislikes: comment.count_dislikes,
			level: threaded.level,
		}
	}
}

impl HbdbService {
	/// Comments of `post_id` in display order.
	pub async fn comments(&self, post_id: i64) -> Result<CommentThreadResponse> {
		if self.corpus.fetch_post(post_id).await?.is_none() {
			return Err(Error::NotFound { message: format!("Post {post_id} does not exist.") });
		}

		let comments = self.corpus.comments(post_id).await?;
		let nodes: Vec<CommentNode> =
			thread::thread(&comments).into_iter().map(CommentNode::from).collect();

		tracing::info!(post_id, comment_count = nodes.len(), "Comment thread served.");

		Ok(CommentThreadResponse { comments: nodes })
	}
}
