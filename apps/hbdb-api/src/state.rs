use std::sync::Arc;

use color_eyre::eyre;

use hbdb_config::{Config, StorageBackend};
use hbdb_service::HbdbService;
use hbdb_storage::{CorpusStore, db::Db, memory::MemoryCorpus};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<HbdbService>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let corpus = open_corpus(&config).await?;

		tracing::info!(backend = config.storage.backend.as_str(), "Corpus store ready.");

		Ok(Self::with_corpus(config, corpus))
	}

	pub fn with_corpus(config: Config, corpus: Arc<dyn CorpusStore>) -> Self {
		Self { service: Arc::new(HbdbService::new(config, corpus)) }
	}
}

async fn open_corpus(config: &Config) -> color_eyre::Result<Arc<dyn CorpusStore>> {
	match config.storage.backend {
		StorageBackend::Memory => {
			let Some(path) = config.storage.snapshot_path.as_deref() else {
				return Err(eyre::eyre!("storage.snapshot_path is required for the memory backend."));
			};

			Ok(Arc::new(MemoryCorpus::load(path)?))
		},
		StorageBackend::Postgres => {
			let Some(postgres) = config.storage.postgres.as_ref() else {
				return Err(eyre::eyre!("storage.postgres is required for the postgres backend."));
			};
			let db = Db::connect(postgres).await?;

			db.ensure_schema().await?;

			Ok(Arc::new(db))
		},
	}
}
