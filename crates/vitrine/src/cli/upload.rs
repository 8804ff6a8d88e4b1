//! Upload command handler.

use super::commands::UploadArgs;
use super::config::load_config;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use vitrine::{
    AssetCredential, AssetService, DraftSession, DraftSnapshot, FileSystemAssetService,
    HttpAssetService, ProductDraft, SourceFile, SubmissionPayload, VitrineConfig, VitrineResult,
};

/// Environment variable holding the asset service bearer token.
const TOKEN_VAR: &str = "VITRINE_ASSET_TOKEN";

/// Upload the given files into a fresh draft, then submit it when a name is given.
pub async fn run_upload(
    args: UploadArgs,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if let Some(limit) = args.max_concurrent {
        config.draft = config.draft.with_max_concurrent_uploads(Some(limit));
    }

    let service = build_service(&args, &config)?;
    info!(backend = service.backend(), files = args.files.len(), "Starting upload");
    let session = DraftSession::new(service, config.draft.clone())?;

    let files = read_files(&args.files).await?;
    let report = session.add_files(files)?.finish().await?;
    debug!(
        uploaded = report.uploaded().len(),
        failed = report.failed().len(),
        "First pass settled"
    );
    if !*config.draft.auto_upload() {
        session.upload_all_pending()?.finish().await?;
    }

    let snapshot = session.snapshot();
    let payload = match &args.name {
        Some(name) => Some(submit(&session, name, &args)?),
        None => None,
    };

    if args.json {
        let output = serde_json::json!({
            "draft": snapshot,
            "payload": payload,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_human(&snapshot, payload.as_ref());
        if let Some(payload) = &payload {
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
    }

    Ok(())
}

fn build_service(args: &UploadArgs, config: &VitrineConfig) -> VitrineResult<Arc<dyn AssetService>> {
    if let Some(dir) = &args.store_dir {
        return Ok(Arc::new(FileSystemAssetService::new(dir)?));
    }

    let service = match &args.endpoint {
        Some(endpoint) => config.service.clone().with_base_url(endpoint.clone()),
        None => config.service.clone(),
    };
    let credential = args
        .token
        .clone()
        .or_else(|| std::env::var(TOKEN_VAR).ok())
        .map(AssetCredential::bearer);
    if credential.is_none() {
        debug!("No asset service credential configured");
    }

    Ok(Arc::new(HttpAssetService::new(service.http_config(credential))?))
}

async fn read_files(paths: &[PathBuf]) -> std::io::Result<Vec<SourceFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        files.push(SourceFile::new(name, bytes));
    }
    Ok(files)
}

fn submit(
    session: &DraftSession,
    name: &str,
    args: &UploadArgs,
) -> Result<SubmissionPayload, Box<dyn std::error::Error>> {
    let product = ProductDraft::builder()
        .name(name)
        .description(args.description.clone())
        .price_cents(args.price_cents)
        .currency(args.currency.clone())
        .build()?;
    Ok(session.submit(product)?)
}

fn print_human(snapshot: &DraftSnapshot, payload: Option<&SubmissionPayload>) {
    println!("Images:");
    println!("{:-<80}", "");
    for asset in &snapshot.assets {
        println!(
            "{:>3}  {:<10} {}",
            asset.order,
            asset.status.to_string(),
            asset.preview_location
        );
    }
    if snapshot.assets.is_empty() {
        println!("  (none)");
    }

    if !snapshot.errors.is_empty() {
        println!();
        println!("Errors:");
        for error in &snapshot.errors {
            println!("  {}", error);
        }
    }

    println!();
    match payload {
        Some(payload) => println!(
            "Submitted '{}' with {} image(s)",
            payload.name,
            payload.images.len()
        ),
        None => println!("Save button: {}", snapshot.submission.label()),
    }
}
