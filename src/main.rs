//! Variantsmith - A/B test variation generator
//!
//! Main entry point for the Variantsmith CLI.

mod adapters;
mod cli;
mod cmd_generate;
mod cmd_inspect;
mod providers;

use clap::Parser;
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use variantsmith_config::{ConfigLoader, LoggingConfig};

use crate::adapters::variantsmith_dir;
use crate::cli::{Cli, Commands};

/// Initialize tracing with console output and an optional rolling log file.
///
/// Console output goes to stderr; stdout carries command results.
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let file_layer = match &config.file_dir {
        Some(dir) => {
            let log_dir = if dir.is_absolute() {
                dir.clone()
            } else {
                variantsmith_dir().join(dir)
            };
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("variantsmith")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The guard flushes on drop; keep it for the program duration.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            let layer = if config.json {
                fmt::layer().json().with_writer(non_blocking).boxed()
            } else {
                fmt::layer().with_writer(non_blocking).with_ansi(false).boxed()
            };
            Some(layer)
        }
        None => None,
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    init_tracing(&config.logging)?;
    debug!(provider = %config.generation.provider, "Configuration loaded");

    match cli.command {
        Commands::Prompt {
            request,
            description,
        } => cmd_generate::prompt(&config, &request, &description),
        Commands::Generate {
            request,
            description,
            output,
        } => cmd_generate::generate(config, &request, &description, output.as_ref()).await,
        Commands::Adjust {
            request,
            code,
            feedback,
            test_result,
            output,
        } => {
            cmd_generate::adjust(
                config,
                &request,
                &code,
                &feedback,
                test_result.as_ref(),
                output.as_ref(),
            )
            .await
        }
        Commands::Parse { file } => cmd_inspect::parse(&file),
        Commands::Validate { code, page, repair } => cmd_inspect::validate(&code, &page, repair),
        Commands::Harness { test } => cmd_inspect::harness(&test),
        Commands::Qa {
            before,
            after,
            request,
            code,
            test_result,
        } => {
            cmd_generate::qa(
                &config,
                &before,
                &after,
                &request,
                &code,
                test_result.as_ref(),
            )
            .await
        }
        Commands::Check => cmd_inspect::check(&config),
    }
}
