use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub backend: StorageBackend,
	/// JSON corpus snapshot loaded by the in-memory backend.
	pub snapshot_path: Option<PathBuf>,
	pub postgres: Option<Postgres>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
	Memory,
	Postgres,
}
impl StorageBackend {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Memory => "memory",
			Self::Postgres => "postgres",
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct Search {
	#[serde(default)]
	pub cache: SearchCache,
}

#[derive(Debug, Deserialize)]
pub struct SearchCache {
	pub enabled: bool,
	/// Number of distinct filter signatures kept per corpus revision.
	pub max_entries: usize,
}
impl Default for SearchCache {
	fn default() -> Self {
		Self { enabled: true, max_entries: default_cache_max_entries() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_cache_max_entries() -> usize {
	256
}
