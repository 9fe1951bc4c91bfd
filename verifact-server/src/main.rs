use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use verifact_common::observability::init_logging;
use verifact_config::VerifactConfigLoader;

/// Fact-check HTTP service.
#[derive(Debug, Parser)]
#[command(name = "verifact", version)]
struct Args {
    /// YAML configuration file; skipped when absent.
    #[arg(long, short, env = "VERIFACT_CONFIG", default_value = "verifact.yaml")]
    config: PathBuf,

    /// Override `server.bind`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Env wins over the file.
    let mut cfg = VerifactConfigLoader::new()
        .with_optional_file(&args.config)
        .load()?;
    if let Some(bind) = args.bind {
        cfg.server.bind = bind;
    }

    let log_path = init_logging(cfg.logging.to_log_config()?)?;
    tracing::info!(config = %args.config.display(), log = %log_path.display(), "verifact.start");

    verifact_server::start_server(cfg).await?;
    Ok(())
}
