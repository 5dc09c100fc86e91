use std::{path::PathBuf, sync::Arc};

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use hbdb_api::{routes, state::AppState};
use hbdb_config::{Config, Search, SearchCache, Security, Service, Storage, StorageBackend};
use hbdb_domain::{
	model::{Comment, Post, TagUsage},
	query::SearchFilter,
};
use hbdb_storage::{BoxFuture, CorpusStore, Error, PostNeighbors, Result, memory::MemoryCorpus};
use hbdb_testkit::FixtureCorpus;

struct UnavailableCorpus;
impl UnavailableCorpus {
	fn failure<T>() -> Result<T> {
		Err(Error::Inconsistent("corpus is offline".to_string()))
	}
}
impl CorpusStore for UnavailableCorpus {
	fn revision(&self) -> BoxFuture<'_, Result<u64>> {
		Box::pin(async { Self::failure() })
	}

	fn find_posts<'a>(&'a self, _filter: &'a SearchFilter) -> BoxFuture<'a, Result<Vec<Post>>> {
		Box::pin(async { Self::failure() })
	}

	fn fetch_post(&self, _post_id: i64) -> BoxFuture<'_, Result<Option<Post>>> {
		Box::pin(async { Self::failure() })
	}

	fn neighbors<'a>(&'a self, _subject: &'a Post) -> BoxFuture<'a, Result<PostNeighbors>> {
		Box::pin(async { Self::failure() })
	}

	fn posts_sharing_tags<'a>(&'a self, _tag_ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Post>>> {
		Box::pin(async { Self::failure() })
	}

	fn latest_posts(&self, _limit: usize) -> BoxFuture<'_, Result<Vec<Post>>> {
		Box::pin(async { Self::failure() })
	}

	fn tag_usage(&self) -> BoxFuture<'_, Result<Vec<TagUsage>>> {
		Box::pin(async { Self::failure() })
	}

	fn comments(&self, _post_id: i64) -> BoxFuture<'_, Result<Vec<Comment>>> {
		Box::pin(async { Self::failure() })
	}
}

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			backend: StorageBackend::Memory,
			snapshot_path: Some(PathBuf::from("corpus.json")),
			postgres: None,
		},
		search: Search { cache: SearchCache { enabled: true, max_entries: 16 } },
		security: Security { bind_localhost_only: true },
	}
}

fn fixture_app() -> Router {
	let FixtureCorpus { tags, posts, comments } = hbdb_testkit::fixture_corpus();
	let corpus = MemoryCorpus::new(tags, posts, comments).expect("Fixture corpus must load.");

	routes::router(AppState::with_corpus(test_config(), Arc::new(corpus)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if body.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&body).expect("Failed to parse response.")
	};

	(status, json)
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")
}

fn post_json(uri: &str, payload: &str) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_ok() {
	let (status, _) = send(fixture_app(), get("/health")).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn search_returns_meta_and_cards() {
	let (status, json) = send(
		fixture_app(),
		post_json("/v1/search", r#"{"tags":["学生","小学生"],"sortMode":"timeAsc"}"#),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["meta"]["totalCount"], 5);
	assert_eq!(json["meta"]["tags"][0]["tagName"], "学生");
	assert_eq!(json["results"][0]["postId"], 103);
	assert_eq!(json["results"][0]["postDateGmt"], "2023-02-13T05:57:26Z");
	assert_eq!(json["results"][0]["tags"], serde_json::json!(["学生", "小学生"]));
}

#[tokio::test]
async fn empty_search_body_uses_defaults() {
	let (status, json) = send(fixture_app(), post_json("/v1/search", "{}")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["meta"]["totalCount"], 12);
	assert_eq!(json["results"].as_array().map(Vec::len), Some(10));
	assert_eq!(json["results"][0]["postId"], 112);
}

#[tokio::test]
async fn invalid_search_is_rejected_with_the_field() {
	let (status, json) = send(fixture_app(), post_json("/v1/search", r#"{"page":0}"#)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
	assert_eq!(json["fields"][0], "page");

	let (status, json) =
		send(fixture_app(), post_json("/v1/search", r#"{"sortMode":"shuffle"}"#)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["fields"][0], "sortMode");
}

#[tokio::test]
async fn malformed_search_body_is_rejected() {
	let (status, json) = send(fixture_app(), post_json("/v1/search", "{\"page\":")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn archive_entry_is_served() {
	let (status, json) = send(fixture_app(), get("/v1/archives/106")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["postTitle"], "部活の大会");
	assert_eq!(json["previousPost"]["postId"], 105);
	assert_eq!(json["nextPost"]["postId"], 107);
	assert_eq!(json["similarPosts"].as_array().map(Vec::len), Some(11));
	assert_eq!(json["similarPosts"][0]["postId"], 112);
}

#[tokio::test]
async fn unknown_archive_is_not_found() {
	let (status, json) = send(fixture_app(), get("/v1/archives/999")).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn non_numeric_post_id_is_rejected() {
	let (status, json) = send(fixture_app(), get("/v1/archives/abc")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["fields"][0], "post_id");
}

#[tokio::test]
async fn comment_thread_is_served() {
	let (status, json) = send(fixture_app(), get("/v1/archives/106/comments")).await;
	let levels: Vec<(i64, i64)> = json["comments"]
		.as_array()
		.expect("comments must be an array.")
		.iter()
		.map(|node| {
			(
				node["commentId"].as_i64().expect("commentId must be numeric."),
				node["level"].as_i64().expect("level must be numeric."),
			)
		})
		.collect();

	assert_eq!(status, StatusCode::OK);
	assert_eq!(levels, vec![(5, 0), (1, 0), (2, 1), (4, 2), (3, 0)]);
}

#[tokio::test]
async fn tag_catalogue_is_served() {
	let (status, json) = send(fixture_app(), get("/v1/tags")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["tags"][0]["tagName"], "学生");
	assert_eq!(json["tags"][0]["count"], 9);
	assert_eq!(json["tags"][5]["count"], 0);

	let (status, json) = send(fixture_app(), get("/v1/tags?sort=name")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["tags"][0]["tagName"], "先生");

	let (status, json) = send(fixture_app(), get("/v1/tags?sort=bogus")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["fields"][0], "sort");
}

#[tokio::test]
async fn storage_failures_map_to_service_unavailable() {
	let app = routes::router(AppState::with_corpus(test_config(), Arc::new(UnavailableCorpus)));
	let (status, json) = send(app.clone(), post_json("/v1/search", "{}")).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(json["error_code"], "STORAGE_ERROR");

	let (status, _) = send(app, get("/v1/archives/1")).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
