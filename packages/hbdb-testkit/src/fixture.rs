//! A small deterministic corpus shared by storage, service and API tests.
//!
//! | id  | day | likes | tags                     | notes                        |
//! |-----|-----|-------|--------------------------|------------------------------|
//! | 101 | 0   | 5     | 学生, 部活               | 部活 in title and content    |
//! | 102 | 1   | 12    | 学生                     | "Rust" in title and content  |
//! | 103 | 2   | 3     | 学生, 小学生             |                              |
//! | 104 | 3   | 12    | 学生, 先生               | "RUST" in content            |
//! | 105 | 4   | 0     | 小学生                   |                              |
//! | 106 | 5   | 8     | 学生, 小学生, 部活       | 部活 in title, five comments |
//! | 107 | 6   | 8     | 恋愛                     |                              |
//! | 108 | 7   | 1     |                          | untagged                     |
//! | 109 | 8   | 4     | 学生, 小学生             |                              |
//! | 110 | 9   | 8     | 学生, 小学生, 先生       | "Rustacean" in content       |
//! | 111 | 10  | 2     | 学生, 部活               | 部活 in content              |
//! | 112 | 11  | 6     | 学生, 小学生, 部活, 恋愛 |                              |
//!
//! Tag 未使用 exists but no post carries it.

use time::{Duration, OffsetDateTime, macros::datetime};

use hbdb_domain::model::{Comment, Post, TagRef};

pub const TAG_STUDENT: i64 = 1;
pub const TAG_PUPIL: i64 = 2;
pub const TAG_CLUB: i64 = 3;
pub const TAG_SENSEI: i64 = 4;
pub const TAG_ROMANCE: i64 = 5;
pub const TAG_UNUSED: i64 = 6;

/// The post carrying the comment thread.
pub const THREADED_POST_ID: i64 = 106;

const EPOCH: OffsetDateTime = datetime!(2023-02-11 05:57:26 UTC);

const TAGS: [(i64, &str); 6] = [
	(TAG_STUDENT, "学生"),
	(TAG_PUPIL, "小学生"),
	(TAG_CLUB, "部活"),
	(TAG_SENSEI, "先生"),
	(TAG_ROMANCE, "恋愛"),
	(TAG_UNUSED, "未使用"),
];

#[allow(clippy::type_complexity)]
const POSTS: [(i64, &str, &str, i64, &[i64]); 12] = [
	(101, "春の部活", "部活の話です。", 5, &[TAG_STUDENT, TAG_CLUB]),
	(102, "Rust入門", "Learning rust every day.", 12, &[TAG_STUDENT]),
	(103, "小学生の日記", "今日は晴れ。", 3, &[TAG_STUDENT, TAG_PUPIL]),
	(104, "先生との会話", "RUST is hard.", 12, &[TAG_STUDENT, TAG_SENSEI]),
	(105, "夏休み", "宿題が多い。", 0, &[TAG_PUPIL]),
	(106, "部活の大会", "勝った！", 8, &[TAG_STUDENT, TAG_PUPIL, TAG_CLUB]),
	(107, "恋の話", "内緒です。", 8, &[TAG_ROMANCE]),
	(108, "雑談", "特になし。", 1, &[]),
	(109, "テスト前", "勉強しないと。", 4, &[TAG_STUDENT, TAG_PUPIL]),
	(110, "先生の一言", "Rustacean と呼ばれた。", 8, &[TAG_STUDENT, TAG_PUPIL, TAG_SENSEI]),
	(111, "放課後", "部活に行く。", 2, &[TAG_STUDENT, TAG_CLUB]),
	(112, "卒業", "さようなら。", 6, &[TAG_STUDENT, TAG_PUPIL, TAG_CLUB, TAG_ROMANCE]),
];

pub struct FixtureCorpus {
	pub tags: Vec<TagRef>,
	pub posts: Vec<Post>,
	pub comments: Vec<Comment>,
}

pub fn fixture_corpus() -> FixtureCorpus {
	FixtureCorpus { tags: fixture_tags(), posts: fixture_posts(), comments: fixture_comments() }
}

pub fn fixture_tags() -> Vec<TagRef> {
	TAGS.iter().map(|(tag_id, tag_name)| tag(*tag_id, tag_name)).collect()
}

pub fn fixture_posts() -> Vec<Post> {
	POSTS
		.iter()
		.enumerate()
		.map(|(day, (post_id, title, content, likes, tag_ids))| {
			let mut post = Post {
				post_id: *post_id,
				title: title.to_string(),
				content: content.to_string(),
				published_at: post_date(day as i64),
				count_likes: *likes,
				count_dislikes: post_id % 3,
				tags: tag_ids
					.iter()
					.filter_map(|tag_id| TAGS.iter().find(|(id, _)| id == tag_id))
					.map(|(tag_id, tag_name)| tag(*tag_id, tag_name))
					.collect(),
			};

			post.normalize_tags();

			post
		})
		.collect()
}

/// Comment 5 points at a parent that does not exist. Expected display order on post 106 is
/// 5, 1, 2, 4, 3 at levels 0, 0, 1, 2, 0.
pub fn fixture_comments() -> Vec<Comment> {
	let base = post_date(5);

	vec![
		comment(1, THREADED_POST_ID, None, base + Duration::hours(1)),
		comment(2, THREADED_POST_ID, Some(1), base + Duration::hours(2)),
		comment(3, THREADED_POST_ID, None, base + Duration::hours(3)),
		comment(4, THREADED_POST_ID, Some(2), base + Duration::hours(4)),
		comment(5, THREADED_POST_ID, Some(99), base + Duration::minutes(30)),
		comment(6, 101, None, post_date(0) + Duration::hours(1)),
	]
}

/// Publication time of the fixture post published on `day`.
pub fn post_date(day: i64) -> OffsetDateTime {
	EPOCH + Duration::days(day)
}

fn tag(tag_id: i64, tag_name: &str) -> TagRef {
	TagRef { tag_id, tag_name: tag_name.to_string() }
}

fn comment(
	comment_id: i64,
	post_id: i64,
	parent_comment_id: Option<i64>,
	created_at: OffsetDateTime,
) -> Comment {
	Comment {
		comment_id,
		post_id,
		parent_comment_id,
		author: format!("名無し{comment_id}"),
		content: format!("コメント{comment_id}"),
		created_at,
		count_likes: comment_id,
		count_dislikes: 0,
	}
}
