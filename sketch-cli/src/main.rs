//! # Sketchboard CLI
//!
//! Replays a board script and saves the picture.

use clap::Parser;
use sketch_cli::{CliArgs, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing on stderr.
///
/// Set `RUST_LOG` to control log levels (default: info). Pass `--log-json`
/// for JSON lines.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    tracing::info!("Starting sketch v{}", sketch_core::VERSION);

    let config = CliConfig::from(args);
    tracing::info!(
        "Board config: {}x{} on {}",
        config.board.width,
        config.board.height,
        config.board.background
    );

    let session = sketch_cli::run(&config)?;

    tracing::info!(
        "Saved {} shapes to {}",
        session.len(),
        config.output.display()
    );
    Ok(())
}
