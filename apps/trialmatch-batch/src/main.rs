use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = trialmatch_batch::Args::parse();

	trialmatch_batch::run(args).await
}
