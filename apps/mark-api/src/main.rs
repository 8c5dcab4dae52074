use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = mark_api::Args::parse();

	mark_api::run(args).await
}
