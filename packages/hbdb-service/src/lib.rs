pub mod archive;
pub mod cache;
pub mod comments;
pub mod search;
pub mod tags;
pub mod time_serde;

mod error;

pub use archive::{ArchiveEntry, ArchiveTag, PostLinkView};
pub use cache::SearchCache;
pub use comments::{CommentNode, CommentThreadResponse};
pub use error::{Error, Result};
pub use search::{MetaTag, PostCard, SearchMeta, SearchRequest, SearchResponse};
pub use tags::{TagListRequest, TagListResponse, TagUsageView};

use std::sync::Arc;

use hbdb_config::Config;
use hbdb_storage::CorpusStore;

/// Read-side entry point over one corpus.
///
/// Holds no per-request state. The search cache is the only mutable state and is scoped to this
/// value.
pub struct HbdbService {
	pub cfg: Config,
	pub corpus: Arc<dyn CorpusStore>,
	cache: SearchCache,
}
impl HbdbService {
	pub fn new(cfg: Config, corpus: Arc<dyn CorpusStore>) -> Self {
		let cache = SearchCache::new(&cfg.search.cache);

		Self { cfg, corpus, cache }
	}

	pub fn cache(&self) -> &SearchCache {
		&self.cache
	}
}
