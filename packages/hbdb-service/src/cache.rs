//! Search results memoized per corpus revision.
//!
//! An entry holds the complete filtered and sorted set for one (keyword, tags, sort mode)
//! signature, so every page and the meta block are served from the same computation. Entries
//! are keyed by a hash that includes the corpus revision; observing a newer revision drops every
//! older entry.

use std::{
	collections::VecDeque,
	sync::{Arc, Mutex, MutexGuard},
};

use ahash::AHashMap;

use hbdb_domain::{
	model::Post,
	query::{SearchFilter, SortMode},
	tag_index::TagCount,
};

use crate::{Error, Result};

const SEARCH_CACHE_SCHEMA_VERSION: i32 = 1;

/// The evaluated form of one search signature, before paging.
#[derive(Debug)]
pub struct SearchSet {
	/// Sorted by the requested mode.
	pub posts: Vec<Post>,
	pub tags: Vec<TagCount>,
}
impl SearchSet {
	pub fn total_count(&self) -> u64 {
		self.posts.len() as u64
	}
}

pub struct SearchCache {
	enabled: bool,
	max_entries: usize,
	state: Mutex<CacheState>,
}
impl SearchCache {
	pub fn new(cfg: &hbdb_config::SearchCache) -> Self {
		Self {
			enabled: cfg.enabled && cfg.max_entries > 0,
			max_entries: cfg.max_entries,
			state: Mutex::new(CacheState::default()),
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn len(&self) -> usize {
		self.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get(&self, revision: u64, key: &str) -> Option<Arc<SearchSet>> {
		if !self.enabled {
			return None;
		}

		let mut state = self.lock();

		state.observe(revision);

		if state.revision != revision {
			return None;
		}

		state.entries.get(key).cloned()
	}

	/// Stores `set` unless a newer revision has been observed since it was computed.
	pub fn insert(&self, revision: u64, key: String, set: Arc<SearchSet>) {
		if !self.enabled {
			return;
		}

		let mut state = self.lock();

		state.observe(revision);

		if state.revision != revision || state.entries.contains_key(&key) {
			return;
		}

		while state.entries.len() >= self.max_entries {
			let Some(oldest) = state.order.pop_front() else {
				break;
			};

			state.entries.remove(&oldest);
		}

		state.order.push_back(key.clone());
		state.entries.insert(key, set);
	}

	fn lock(&self) -> MutexGuard<'_, CacheState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}

#[derive(Default)]
struct CacheState {
	revision: u64,
	entries: AHashMap<String, Arc<SearchSet>>,
	/// Insertion order, oldest first.
	order: VecDeque<String>,
}
impl CacheState {
	fn observe(&mut self, revision: u64) {
		if revision <= self.revision {
			return;
		}

		if !self.entries.is_empty() {
			tracing::debug!(
				previous_revision = self.revision,
				revision,
				dropped = self.entries.len(),
				"Search cache invalidated."
			);
		}

		self.revision = revision;
		self.entries.clear();
		self.order.clear();
	}
}

pub fn search_cache_key(revision: u64, filter: &SearchFilter, sort: SortMode) -> Result<String> {
	let payload = serde_json::json!({
		"kind": "search",
		"schema_version": SEARCH_CACHE_SCHEMA_VERSION,
		"revision": revision,
		"keyword": filter.keyword(),
		"tags": filter.tags(),
		"sort_mode": sort.as_str(),
	});
	let raw = serde_json::to_vec(&payload).map_err(|err| Error::Storage {
		message: format!("Failed to encode cache key payload: {err}"),
	})?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}

pub fn cache_key_prefix(key: &str) -> &str {
	let len = key.len().min(12);

	&key[..len]
}
