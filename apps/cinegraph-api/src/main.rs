use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = cinegraph_api::Args::parse();

	cinegraph_api::run(args).await
}
