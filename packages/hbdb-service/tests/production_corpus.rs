//! Reference scenarios against the production corpus. Point `HBDB_CORPUS_PG_DSN` at a database
//! holding it; these tests only read.

use std::{env, path::PathBuf, sync::Arc};

use hbdb_config::{Config, Postgres, Search, SearchCache, Security, Service, Storage, StorageBackend};
use hbdb_service::{ArchiveTag, HbdbService, SearchRequest};
use hbdb_storage::db::Db;

const TIME_ASC_TITLES: [&str; 10] = [
	"就職活動で「本当は働きたくないんですが...」と言ってはいけない",
	"文化祭でゲイポルノビデオ作品を切り貼りしたポスターを作ってはいけない",
	"就職活動で他社の志望度が高いと言ってはならない",
	"人と話す時は目を見てハッキリした声で話した方がよい",
	"親孝行した方がよい",
	"他人との非日常的な食事中に美味しいと感じている旨を伝えなければならない",
	"声が小さいことを指摘された後に最大音量で発声してはならない",
	"「テーマは自由に決めてよい」と言われた場合に本当に自由に決定してはいけない",
	"LINEの返信時には30分以上空けなければならない",
	"他人がケガをした際にまずする話の議題は「ミトコンドリア」ではない",
];

fn corpus_dsn() -> Option<String> {
	env::var("HBDB_CORPUS_PG_DSN").ok()
}

async fn production_service(dsn: String) -> HbdbService {
	let postgres = Postgres { dsn, pool_max_conns: 2 };
	let db = Db::connect(&postgres).await.expect("Failed to connect to Postgres.");
	let cfg = Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			backend: StorageBackend::Postgres,
			snapshot_path: None::<PathBuf>,
			postgres: Some(postgres),
		},
		search: Search { cache: SearchCache { enabled: true, max_entries: 8 } },
		security: Security { bind_localhost_only: true },
	};

	HbdbService::new(cfg, Arc::new(db))
}

#[tokio::test]
#[ignore = "Requires the production corpus. Set HBDB_CORPUS_PG_DSN to run."]
async fn archive_entry_23576_matches_reference() {
	let Some(dsn) = corpus_dsn() else {
		eprintln!(
			"Skipping archive_entry_23576_matches_reference; set HBDB_CORPUS_PG_DSN to run this test."
		);

		return;
	};
	let service = production_service(dsn).await;
	let entry = service.get_data(23576).await.expect("get_data failed.");
	let value = serde_json::to_value(&entry).expect("Entry must serialize.");

	assert_eq!(entry.post_id, 23576);
	assert_eq!(entry.post_title, "無神論者の火");

	for (tag_name, tag_id) in [("クリスマス", 381), ("学生", 21), ("小学生", 35)] {
		assert!(entry.tags.contains(&ArchiveTag { tag_name: tag_name.to_string(), tag_id }));
	}

	assert!(entry.count_likes > 30);
	assert!(entry.count_dislikes > 5);
	assert_eq!(value["postDateGmt"], "2023-02-11T05:57:26Z");
	assert!(!entry.post_content.is_empty());
	assert_eq!(entry.similar_posts.len(), 15);
	assert_eq!(
		entry.previous_post.map(|link| link.post_title).as_deref(),
		Some("無知識でアナルにローターを入れるべきでは無い")
	);
	assert_eq!(
		entry.next_post.map(|link| link.post_title).as_deref(),
		Some("無能が消去法で大学を決めるべきではない")
	);
}

#[tokio::test]
#[ignore = "Requires the production corpus. Set HBDB_CORPUS_PG_DSN to run."]
async fn oldest_first_search_matches_reference() {
	let Some(dsn) = corpus_dsn() else {
		eprintln!(
			"Skipping oldest_first_search_matches_reference; set HBDB_CORPUS_PG_DSN to run this test."
		);

		return;
	};
	let service = production_service(dsn).await;
	let response = service
		.search(SearchRequest { sort_mode: "timeAsc".to_string(), ..SearchRequest::default() })
		.await
		.expect("search failed.");
	let unrecommended = response
		.meta
		.tags
		.iter()
		.find(|tag| tag.tag_name == "やってはいけないこと")
		.map(|tag| tag.count)
		.expect("Tag must be listed.");

	assert!(response.meta.total_count > 8_000);
	assert!(unrecommended >= 2_000);
	assert_eq!(
		response.results.iter().map(|card| card.post_title.as_str()).collect::<Vec<_>>(),
		TIME_ASC_TITLES
	);
}
