use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use llamenu::console::stdin_source;
use llamenu::{MenuController, Settings};

/// Interactive menu for browsing, chatting with, and deriving local models
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory holding default.toml / local.toml
    #[arg(long, default_value = "config")]
    config: PathBuf,

    /// Model server address, overriding the configured one
    #[arg(long)]
    base_url: Option<String>,
}

/// Main entry point for llamenu
///
/// Loads settings, sends diagnostics to a daily log file, and runs the
/// interactive menu on a single-threaded runtime.
///
/// # Errors
/// Returns an error only if settings cannot be loaded or the log directory
/// cannot be prepared; everything after start-up is reported on the console.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config, cli.base_url).context("Failed to load settings")?;

    // Initialize the subscriber first, before any file operations
    std::fs::create_dir_all(&settings.logging.directory).with_context(|| {
        format!(
            "Failed to create log directory {}",
            settings.logging.directory.display()
        )
    })?;
    let file_appender = tracing_appender::rolling::RollingFileAppender::new(
        tracing_appender::rolling::Rotation::DAILY,
        &settings.logging.directory,
        "llamenu",
    );
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        // The console belongs to the menu, so diagnostics only go to the file
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_line_number(true)
        .with_file(true)
        .with_target(false)
        .with_env_filter(EnvFilter::new(settings.logging.level.to_lowercase()))
        .init();

    info!("llamenu starting up");
    info!("Model server: {}", settings.base_url());
    info!("Session logs: {}", settings.sessions.directory.display());

    let mut input = stdin_source().context("Failed to open console input")?;
    let controller = MenuController::from_settings(&settings);

    if let Err(e) = controller.run(input.as_mut(), &mut io::stdout()).await {
        error!("Menu stopped: {}", e);
        eprintln!("Console error: {}", e);
    }

    info!("llamenu shutting down");
    Ok(())
}
