use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = hbdb_api::Args::parse();

	hbdb_api::run(args).await
}
