use std::{env, fs, path::PathBuf};

use serde_json::json;
use uuid::Uuid;

use hbdb_domain::{
	model::{Post, TagRef},
	query::SearchFilter,
};
use hbdb_storage::{CorpusStore, Error, PostLink, memory::MemoryCorpus};
use hbdb_testkit::{FixtureCorpus, TAG_CLUB, TAG_STUDENT, TAG_UNUSED, THREADED_POST_ID};

fn fixture_store() -> MemoryCorpus {
	let FixtureCorpus { tags, posts, comments } = hbdb_testkit::fixture_corpus();

	MemoryCorpus::new(tags, posts, comments).expect("Fixture corpus must load.")
}

fn post_ids(posts: &[Post]) -> Vec<i64> {
	posts.iter().map(|post| post.post_id).collect()
}

struct TempFile(PathBuf);
impl TempFile {
	fn write(contents: &str) -> Self {
		let path = env::temp_dir().join(format!("hbdb_snapshot_{}.json", Uuid::new_v4().simple()));

		fs::write(&path, contents).expect("Failed to write snapshot file.");

		Self(path)
	}
}
impl Drop for TempFile {
	fn drop(&mut self) {
		let _ = fs::remove_file(&self.0);
	}
}

#[tokio::test]
async fn find_posts_returns_only_matching_posts() {
	let store = fixture_store();
	let filter = SearchFilter::parse("rust", &[]).expect("Filter must parse.");
	let mut found = post_ids(&store.find_posts(&filter).await.expect("find_posts failed."));

	found.sort_unstable();

	assert_eq!(found, vec![102, 104, 110]);

	let everything = store.find_posts(&SearchFilter::all()).await.expect("find_posts failed.");

	assert_eq!(everything.len(), 12);
}

#[tokio::test]
async fn fetch_post_returns_tags_sorted_by_id() {
	let store = fixture_store();
	let post = store.fetch_post(112).await.expect("fetch_post failed.").expect("Post 112 exists.");
	let tag_ids: Vec<i64> = post.tags.iter().map(|tag| tag.tag_id).collect();

	assert_eq!(tag_ids, vec![1, 2, 3, 5]);
	assert!(store.fetch_post(999).await.expect("fetch_post failed.").is_none());
}

#[tokio::test]
async fn neighbors_follow_publication_order() {
	let store = fixture_store();
	let middle = store.fetch_post(106).await.expect("fetch_post failed.").expect("Post exists.");
	let neighbors = store.neighbors(&middle).await.expect("neighbors failed.");

	assert_eq!(neighbors.previous.map(|link| link.post_id), Some(105));
	assert_eq!(neighbors.next.map(|link| link.post_id), Some(107));

	let first = store.fetch_post(101).await.expect("fetch_post failed.").expect("Post exists.");
	let neighbors = store.neighbors(&first).await.expect("neighbors failed.");

	assert_eq!(neighbors.previous, None);
	assert_eq!(neighbors.next, Some(PostLink { post_id: 102, title: "Rust入門".to_string() }));
}

#[tokio::test]
async fn latest_posts_are_newest_first() {
	let store = fixture_store();
	let latest = store.latest_posts(3).await.expect("latest_posts failed.");

	assert_eq!(post_ids(&latest), vec![112, 111, 110]);
	assert_eq!(store.latest_posts(100).await.expect("latest_posts failed.").len(), 12);
}

#[tokio::test]
async fn posts_sharing_tags_matches_any_listed_tag() {
	let store = fixture_store();
	let mut found = post_ids(
		&store.posts_sharing_tags(&[TAG_CLUB, TAG_UNUSED]).await.expect("posts_sharing_tags failed."),
	);

	found.sort_unstable();

	assert_eq!(found, vec![101, 106, 111, 112]);
	assert!(store.posts_sharing_tags(&[]).await.expect("posts_sharing_tags failed.").is_empty());
}

#[tokio::test]
async fn tag_usage_includes_unused_tags() {
	let store = fixture_store();
	let usage = store.tag_usage().await.expect("tag_usage failed.");
	let count_of = |tag_id: i64| {
		usage.iter().find(|tag| tag.tag_id == tag_id).map(|tag| tag.count).expect("Tag is listed.")
	};

	assert_eq!(usage.len(), 6);
	assert_eq!(count_of(TAG_STUDENT), 9);
	assert_eq!(count_of(TAG_CLUB), 4);
	assert_eq!(count_of(TAG_UNUSED), 0);
}

#[tokio::test]
async fn writes_bump_the_revision() {
	let store = fixture_store();
	let before = store.revision().await.expect("revision failed.");
	let mut post = store.fetch_post(108).await.expect("fetch_post failed.").expect("Post exists.");

	post.title = "雑談 (編集済み)".to_string();
	post.tags = vec![TagRef { tag_id: TAG_UNUSED, tag_name: "未使用".to_string() }];

	store.upsert_post(post).expect("upsert_post failed.");

	let after = store.revision().await.expect("revision failed.");

	assert!(after > before);
	assert_eq!(store.post_count(), 12);

	let usage = store.tag_usage().await.expect("tag_usage failed.");

	assert_eq!(usage.iter().find(|tag| tag.tag_id == TAG_UNUSED).map(|tag| tag.count), Some(1));
}

#[tokio::test]
async fn upsert_rejects_unknown_tags_without_changing_state() {
	let store = fixture_store();
	let before = store.revision().await.expect("revision failed.");
	let mut post = store.fetch_post(108).await.expect("fetch_post failed.").expect("Post exists.");

	post.tags = vec![TagRef { tag_id: 77, tag_name: "幽霊".to_string() }];

	let err = store.upsert_post(post).expect_err("Unknown tag must be rejected.");

	assert!(matches!(err, Error::InvalidArgument(_)), "Unexpected error: {err:?}");
	assert_eq!(store.revision().await.expect("revision failed."), before);
}

#[tokio::test]
async fn remove_post_drops_its_comments() {
	let store = fixture_store();

	assert_eq!(store.comments(THREADED_POST_ID).await.expect("comments failed.").len(), 5);

	store.remove_post(THREADED_POST_ID).expect("remove_post failed.");

	assert!(store.fetch_post(THREADED_POST_ID).await.expect("fetch_post failed.").is_none());
	assert!(store.comments(THREADED_POST_ID).await.expect("comments failed.").is_empty());
	assert!(matches!(store.remove_post(THREADED_POST_ID), Err(Error::NotFound(_))));
}

#[test]
fn duplicate_post_ids_are_rejected() {
	let FixtureCorpus { tags, mut posts, comments } = hbdb_testkit::fixture_corpus();
	let copy = posts[0].clone();

	posts.push(copy);

	assert!(matches!(MemoryCorpus::new(tags, posts, comments), Err(Error::Conflict(_))));
}

#[tokio::test]
async fn snapshot_loads_and_skips_unknown_tag_ids() {
	let snapshot = json!({
		"tags": [
			{ "tagId": 1, "tagName": "学生" },
			{ "tagId": 2, "tagName": "小学生" }
		],
		"posts": [
			{
				"postId": 23576,
				"postTitle": "新学期",
				"postContent": "はじめまして。",
				"postDateGmt": "2023-02-11T05:57:26Z",
				"countLikes": 3,
				"countDislikes": 1,
				"tagIds": [2, 1, 404]
			},
			{
				"postId": 23577,
				"postTitle": "二日目",
				"postDateGmt": "2023-02-12T14:57:26+09:00"
			}
		],
		"comments": [
			{
				"commentId": 1,
				"postId": 23576,
				"commentAuthor": "名無し",
				"commentContent": "よろしく",
				"commentDateGmt": "2023-02-11T06:00:00Z"
			}
		]
	});
	let file = TempFile::write(&snapshot.to_string());
	let store = MemoryCorpus::load(&file.0).expect("Snapshot must load.");

	assert_eq!(store.post_count(), 2);

	let post = store.fetch_post(23576).await.expect("fetch_post failed.").expect("Post exists.");

	assert_eq!(post.tag_names(), vec!["学生".to_string(), "小学生".to_string()]);

	let second = store.fetch_post(23577).await.expect("fetch_post failed.").expect("Post exists.");

	assert!(second.tags.is_empty());
	assert_eq!(second.content, "");
	assert_eq!(second.published_at.offset(), time::UtcOffset::UTC);
	assert_eq!(store.comments(23576).await.expect("comments failed.").len(), 1);
}

#[test]
fn malformed_snapshot_reports_the_path() {
	let file = TempFile::write("{ \"posts\": [");
	let err = MemoryCorpus::load(&file.0).err().expect("Malformed snapshot must fail.");

	assert!(matches!(err, Error::DecodeSnapshot { .. }), "Unexpected error: {err:?}");

	let missing = env::temp_dir().join("hbdb_snapshot_missing.json");
	let err = MemoryCorpus::load(&missing).err().expect("Missing snapshot must fail.");

	assert!(matches!(err, Error::ReadSnapshot { .. }), "Unexpected error: {err:?}");
}
