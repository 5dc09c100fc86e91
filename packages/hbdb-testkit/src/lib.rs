//! Test support shared by the hbdb crates: a deterministic post corpus and scratch Postgres
//! databases for the ignored integration tests.

mod error;
mod fixture;

pub use error::{Error, Result};
pub use fixture::*;

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

/// Databases tried, in order, for `CREATE DATABASE` and `DROP DATABASE`.
const MAINTENANCE_DATABASES: [&str; 2] = ["postgres", "template1"];

/// Base DSN for the Postgres tests, taken from `HBDB_PG_DSN`. Blank counts as unset.
pub fn env_dsn() -> Option<String> {
	env::var("HBDB_PG_DSN").ok().filter(|dsn| !dsn.trim().is_empty())
}

/// An empty database created next to the one `HBDB_PG_DSN` names.
///
/// Call [`TestDatabase::cleanup`] at the end of a test. A database that is only dropped
/// still gets removed, from a helper thread.
pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn).map_err(Error::InvalidDsn)?;
		let (maintenance, mut conn) = maintenance_connection(&base).await?;
		let name = format!("hbdb_test_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|source| Error::Create { name: name.clone(), source })?;
		conn.close().await.ok();

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.maintenance, &self.name).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = std::mem::take(&mut self.name);
		let maintenance = self.maintenance.clone();
		// The test runtime may be the current thread, so cleanup runs on its own.
		let handle = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| err.to_string())
				.and_then(|runtime| {
					runtime.block_on(drop_database(&maintenance, &name)).map_err(|err| err.to_string())
				});

			if let Err(message) = result {
				eprintln!("Scratch database was not dropped: {message}");
			}
		});

		handle.join().ok();
	}
}

async fn maintenance_connection(
	base: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let [primary, fallback] = MAINTENANCE_DATABASES;
	let options = base.clone().database(primary);

	if let Ok(conn) = PgConnection::connect_with(&options).await {
		return Ok((options, conn));
	}

	let options = base.clone().database(fallback);
	let conn =
		PgConnection::connect_with(&options).await.map_err(Error::NoMaintenanceDatabase)?;

	Ok((options, conn))
}

async fn drop_database(maintenance: &PgConnectOptions, name: &str) -> Result<()> {
	let drop_error = |source| Error::Drop { name: name.to_string(), source };
	let mut conn = PgConnection::connect_with(maintenance).await.map_err(drop_error)?;

	// FORCE ends sessions a failed test left open on the database.
	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#).as_str())
		.await
		.map_err(drop_error)?;
	conn.close().await.ok();

	Ok(())
}
