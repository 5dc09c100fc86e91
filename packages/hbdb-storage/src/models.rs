use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
	pub post_id: i64,
	pub post_title: String,
	pub post_content: String,
	pub post_date_gmt: OffsetDateTime,
	pub count_likes: i64,
	pub count_dislikes: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PostTagRow {
	pub post_id: i64,
	pub tag_id: i64,
	pub tag_name: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PostLinkRow {
	pub post_id: i64,
	pub post_title: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct TagUsageRow {
	pub tag_id: i64,
	pub tag_name: String,
	pub usage_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CommentRow {
	pub comment_id: i64,
	pub post_id: i64,
	pub parent_comment_id: Option<i64>,
	pub comment_author: String,
	pub comment_content: String,
	pub comment_date_gmt: OffsetDateTime,
	pub count_likes: i64,
	pub count_dislikes: i64,
}
