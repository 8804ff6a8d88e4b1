//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Vitrine - upload product images and build a draft submission
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(about = "Upload product images and build a draft submission", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file to use instead of the layered defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload images into a new draft and optionally submit it
    Upload(UploadArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments of the `upload` command
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Image files, in display order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Product name; submits the draft when set
    #[arg(long)]
    pub name: Option<String>,

    /// Product description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Price in minor currency units
    #[arg(long, default_value_t = 0)]
    pub price_cents: u64,

    /// ISO 4217 currency code
    #[arg(long, default_value = "USD")]
    pub currency: String,

    /// Store images in this directory instead of the asset service
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Asset service base URL (overrides configuration)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Bearer token for the asset service (defaults to VITRINE_ASSET_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Cap concurrent uploads (overrides configuration)
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "vitrine",
            "upload",
            "a.png",
            "b.png",
            "--name",
            "Lamp",
            "--price-cents",
            "4500",
            "--store-dir",
            "/tmp/assets",
        ])
        .unwrap();

        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.name.as_deref(), Some("Lamp"));
                assert_eq!(args.price_cents, 4500);
                assert_eq!(args.currency, "USD");
                assert!(args.store_dir.is_some());
                assert!(!args.json);
            }
            Commands::Config => panic!("expected upload"),
        }
    }

    #[test]
    fn test_upload_requires_files() {
        assert!(Cli::try_parse_from(["vitrine", "upload"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["vitrine", "config", "--verbose", "--config", "x.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Config));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
