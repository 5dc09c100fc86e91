//! Postgres implementation of the corpus read primitives, plus the write helpers loaders and
//! tests use to populate a database.

use ahash::AHashMap;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use time::UtcOffset;

use hbdb_domain::{
	model::{Comment, Post, TagRef, TagUsage},
	query::SearchFilter,
};

use crate::{
	BoxFuture, CorpusStore, PostLink, PostNeighbors, Result,
	db::Db,
	models::{CommentRow, PostLinkRow, PostRow, PostTagRow, TagUsageRow},
};

const POST_COLUMNS: &str =
	"p.post_id, p.post_title, p.post_content, p.post_date_gmt, p.count_likes, p.count_dislikes";

impl CorpusStore for Db {
	fn revision(&self) -> BoxFuture<'_, Result<u64>> {
		Box::pin(async move {
			let revision: i64 =
				sqlx::query_scalar("SELECT revision FROM corpus_revision WHERE id = 1")
					.fetch_one(&self.pool)
					.await?;

			Ok(revision.max(0) as u64)
		})
	}

	fn find_posts<'a>(&'a self, filter: &'a SearchFilter) -> BoxFuture<'a, Result<Vec<Post>>> {
		Box::pin(async move {
			let mut tx = self.pool.begin().await?;

			// Post rows and their tag rows must come from the same snapshot.
			sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
				.execute(&mut *tx)
				.await?;

			let mut builder: QueryBuilder<Postgres> =
				QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts p WHERE TRUE"));

			// Keywords are left to `SearchFilter::matches`. Postgres `lower()` follows the
			// database ctype and under `C` folds ASCII only.
			if !filter.tags().is_empty() {
				builder.push(
					" AND p.post_id IN (\
SELECT pt.post_id FROM post_tags pt JOIN tags t ON t.tag_id = pt.tag_id \
WHERE t.tag_name = ANY(",
				);
				builder.push_bind(filter.tags());
				builder.push(") GROUP BY pt.post_id HAVING COUNT(DISTINCT t.tag_name) = ");
				builder.push_bind(filter.tags().len() as i64);
				builder.push(")");
			}

			let rows: Vec<PostRow> = builder.build_query_as().fetch_all(&mut *tx).await?;
			let posts = attach_tags(&mut tx, rows).await?;

			tx.commit().await?;

			Ok(posts)
		})
	}

	fn fetch_post(&self, post_id: i64) -> BoxFuture<'_, Result<Option<Post>>> {
		Box::pin(async move {
			let mut conn = self.pool.acquire().await?;
			let row: Option<PostRow> = sqlx::query_as(&format!(
				"SELECT {POST_COLUMNS} FROM posts p WHERE p.post_id = $1"
			))
			.bind(post_id)
			.fetch_optional(&mut *conn)
			.await?;
			let Some(row) = row else {
				return Ok(None);
			};
			let mut posts = attach_tags(&mut conn, vec![row]).await?;

			Ok(posts.pop())
		})
	}

	fn neighbors<'a>(&'a self, subject: &'a Post) -> BoxFuture<'a, Result<PostNeighbors>> {
		Box::pin(async move {
			let previous: Option<PostLinkRow> = sqlx::query_as(
				"\
SELECT post_id, post_title
FROM posts
WHERE (post_date_gmt, post_id) < ($1, $2)
ORDER BY post_date_gmt DESC, post_id DESC
LIMIT 1",
			)
			.bind(subject.published_at)
			.bind(subject.post_id)
			.fetch_optional(&self.pool)
			.await?;
			let next: Option<PostLinkRow> = sqlx::query_as(
				"\
SELECT post_id, post_title
FROM posts
WHERE (post_date_gmt, post_id) > ($1, $2)
ORDER BY post_date_gmt ASC, post_id ASC
LIMIT 1",
			)
			.bind(subject.published_at)
			.bind(subject.post_id)
			.fetch_optional(&self.pool)
			.await?;

			Ok(PostNeighbors {
				previous: previous.map(|row| PostLink { post_id: row.post_id, title: row.post_title }),
				next: next.map(|row| PostLink { post_id: row.post_id, title: row.post_title }),
			})
		})
	}

	fn posts_sharing_tags<'a>(&'a self, tag_ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Post>>> {
		Box::pin(async move {
			if tag_ids.is_empty() {
				return Ok(Vec::new());
			}

			let mut conn = self.pool.acquire().await?;
			let rows: Vec<PostRow> = sqlx::query_as(&format!(
				"\
SELECT {POST_COLUMNS}
FROM posts p
WHERE EXISTS (
	SELECT 1 FROM post_tags pt WHERE pt.post_id = p.post_id AND pt.tag_id = ANY($1)
)"
			))
			.bind(tag_ids)
			.fetch_all(&mut *conn)
			.await?;

			attach_tags(&mut conn, rows).await
		})
	}

	fn latest_posts(&self, limit: usize) -> BoxFuture<'_, Result<Vec<Post>>> {
		Box::pin(async move {
			let mut conn = self.pool.acquire().await?;
			let rows: Vec<PostRow> = sqlx::query_as(&format!(
				"\
SELECT {POST_COLUMNS}
FROM posts p
ORDER BY p.post_date_gmt DESC, p.post_id DESC
LIMIT $1"
			))
			.bind(i64::try_from(limit).unwrap_or(i64::MAX))
			.fetch_all(&mut *conn)
			.await?;

			attach_tags(&mut conn, rows).await
		})
	}

	fn tag_usage(&self) -> BoxFuture<'_, Result<Vec<TagUsage>>> {
		Box::pin(async move {
			let rows: Vec<TagUsageRow> = sqlx::query_as(
				"\
SELECT t.tag_id, t.tag_name, COUNT(pt.post_id) AS usage_count
FROM tags t
LEFT JOIN post_tags pt ON pt.tag_id = t.tag_id
GROUP BY t.tag_id, t.tag_name",
			)
			.fetch_all(&self.pool)
			.await?;

			Ok(rows
				.into_iter()
				.map(|row| TagUsage {
					tag_id: row.tag_id,
					tag_name: row.tag_name,
					count: row.usage_count.max(0) as u64,
				})
				.collect())
		})
	}

	fn comments(&self, post_id: i64) -> BoxFuture<'_, Result<Vec<Comment>>> {
		Box::pin(async move {
			let rows: Vec<CommentRow> = sqlx::query_as(
				"\
SELECT
	comment_id,
	post_id,
	parent_comment_id,
	comment_author,
	comment_content,
	comment_date_gmt,
	count_likes,
	count_dislikes
FROM comments
WHERE post_id = $1",
			)
			.bind(post_id)
			.fetch_all(&self.pool)
			.await?;

			Ok(rows
				.into_iter()
				.map(|row| Comment {
					comment_id: row.comment_id,
					post_id: row.post_id,
					parent_comment_id: row.parent_comment_id,
					author: row.comment_author,
					content: row.comment_content,
					created_at: row.comment_date_gmt.to_offset(UtcOffset::UTC),
					count_likes: row.count_likes,
					count_dislikes: row.count_dislikes,
				})
				.collect())
		})
	}
}

pub async fn insert_tag(db: &Db, tag: &TagRef) -> Result<()> {
	sqlx::query("INSERT INTO tags (tag_id, tag_name) VALUES ($1, $2)")
		.bind(tag.tag_id)
		.bind(tag.tag_name.as_str())
		.execute(&db.pool)
		.await?;

	Ok(())
}

/// Inserts `post` and its tag associations. The tags must already exist.
pub async fn insert_post(db: &Db, post: &Post) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	sqlx::query(
		"\
INSERT INTO posts (post_id, post_title, post_content, post_date_gmt, count_likes, count_dislikes)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(post.post_id)
	.bind(post.title.as_str())
	.bind(post.content.as_str())
	.bind(post.published_at)
	.bind(post.count_likes)
	.bind(post.count_dislikes)
	.execute(&mut *tx)
	.await?;

	for tag in &post.tags {
		sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
			.bind(post.post_id)
			.bind(tag.tag_id)
			.execute(&mut *tx)
			.await?;
	}

	tx.commit().await?;

	Ok(())
}

pub async fn insert_comment(db: &Db, comment: &Comment) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO comments (
	comment_id,
	post_id,
	parent_comment_id,
	comment_author,
	comment_content,
	comment_date_gmt,
	count_likes,
	count_dislikes
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(comment.comment_id)
	.bind(comment.post_id)
	.bind(comment.parent_comment_id)
	.bind(comment.author.as_str())
	.bind(comment.content.as_str())
	.bind(comment.created_at)
	.bind(comment.count_likes)
	.bind(comment.count_dislikes)
	.execute(&db.pool)
	.await?;

	Ok(())
}

async fn attach_tags(conn: &mut PgConnection, rows: Vec<PostRow>) -> Result<Vec<Post>> {
	if rows.is_empty() {
		return Ok(Vec::new());
	}

	let post_ids: Vec<i64> = rows.iter().map(|row| row.post_id).collect();
	let tag_rows: Vec<PostTagRow> = sqlx::query_as(
		"\
SELECT pt.post_id, t.tag_id, t.tag_name
FROM post_tags pt
JOIN tags t ON t.tag_id = pt.tag_id
WHERE pt.post_id = ANY($1)",
	)
	.bind(&post_ids)
	.fetch_all(&mut *conn)
	.await?;
	let mut tags_by_post: AHashMap<i64, Vec<TagRef>> = AHashMap::with_capacity(rows.len());

	for row in tag_rows {
		tags_by_post
			.entry(row.post_id)
			.or_default()
			.push(TagRef { tag_id: row.tag_id, tag_name: row.tag_name });
	}

	Ok(rows
		.into_iter()
		.map(|row| {
			let mut post = Post {
				post_id: row.post_id,
				title: row.post_title,
				content: row.post_content,
				published_at: row.post_date_gmt.to_offset(UtcOffset::UTC),
				count_likes: row.count_likes,
				count_dislikes: row.count_dislikes,
				tags: tags_by_post.remove(&row.post_id).unwrap_or_default(),
			};

			post.normalize_tags();

			post
		})
		.collect())
}
