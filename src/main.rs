use anyhow::Result;
use clap::Parser;

use vingest::cli::Cli;
use vingest::logging;
use vingest::models::Config;
use vingest::services::{IngestPipeline, OpenAiEmbedder, PineconeIndex};
use vingest::sources::FsLoader;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let _guard = logging::init(&config.log_file_path, cli.verbose)?;

    let loader = FsLoader;
    let embedder = OpenAiEmbedder::new(&config)?;
    let index = PineconeIndex::ensure(&config).await?;

    let pipeline = IngestPipeline::new(&config, &loader, &embedder, &index);
    let summary = pipeline.run(&config.raw_data_path).await;

    if summary.halted {
        anyhow::bail!(
            "pipeline halted on upsert failure: {} of {} chunks upserted",
            summary.chunks_upserted,
            summary.chunks_total
        );
    }

    Ok(())
}
