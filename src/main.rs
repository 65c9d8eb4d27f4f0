use std::path::PathBuf;
use std::process::ExitCode;

use auto_caption_lib::DEFAULT_CONFIG_FILE;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Caption every image in a folder with a local Ollama vision model
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match auto_caption_lib::run(&args.config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) if auto_caption_lib::is_missing_config(&err) => {
            tracing::error!("{err:#}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(1)
        }
    }
}
