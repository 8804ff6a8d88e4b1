//! Vitrine CLI binary.
//!
//! This binary provides command-line access to Vitrine's functionality:
//! - Upload images into a product draft and submit it
//! - Inspect the effective configuration

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_upload, show_config};

    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json)?;

    match cli.command {
        Commands::Upload(args) => {
            run_upload(args, cli.config.as_deref()).await?;
        }

        Commands::Config => {
            show_config(cli.config.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(feature = "observability")]
fn init_tracing(verbose: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    use vitrine::observability::{ObservabilityConfig, init_observability};

    let mut config = ObservabilityConfig::new("vitrine").with_json_logs(json);
    if verbose {
        config = config.with_log_level("debug");
    }
    init_observability(config)
}

#[cfg(not(feature = "observability"))]
fn init_tracing(verbose: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = if verbose {
        EnvFilter::try_new("debug")?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info,vitrine=debug"))?
    };

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
