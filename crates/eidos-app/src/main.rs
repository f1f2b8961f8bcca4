//! eidos: submit a media file + target prompt to the Neural Bridge
//! segmentation service and print the resulting artifact URI.
//!
//! Images resolve synchronously; videos start a server-side job that is
//! polled to completion, with progress reported on the way.

mod cli;

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use eidos_bridge::{BridgeClient, BridgeConfig, SegmentationService};
use eidos_workspace::{AnalysisResult, Workspace, WorkspaceEvent};

/// Declared content type for an upload, from the file extension.
/// Mirrors what a browser would declare for the same file.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn run(args: cli::Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match args.bridge_url {
        Some(url) => BridgeConfig::new(url),
        None => BridgeConfig::from_env(),
    };
    tracing::info!(base_url = %config.base_url, "connecting to Neural Bridge");
    let client = Arc::new(BridgeClient::new(config));

    match client.liveness().await {
        Ok(status) if status.is_online() => {
            tracing::info!(model_loaded = status.model_loaded, "bridge online");
        }
        Ok(status) => tracing::warn!(status = %status.status, "bridge not online"),
        Err(e) => tracing::warn!("liveness probe failed: {e}"),
    }

    let bytes = std::fs::read(&args.file)?;
    let filename = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let content_type = guess_content_type(&args.file);

    let mut workspace = Workspace::new(client);
    {
        let asset = workspace.select_asset(filename, content_type, bytes)?;
        tracing::info!(
            kind = ?asset.kind,
            display_uri = %asset.display_uri,
            "asset selected"
        );
    }

    workspace.submit(&args.prompt)?;
    tracing::info!(prompt = %args.prompt, "target locked, processing");

    while workspace.state().is_processing() {
        let Some(event) = workspace.next_event().await else {
            break;
        };
        if let WorkspaceEvent::JobProgress { progress, .. } = &event {
            tracing::info!(progress = *progress, "processing");
        }
        workspace.apply(event);
    }

    match workspace.state().result() {
        Some(AnalysisResult::Image { overlay_uri }) => println!("{overlay_uri}"),
        Some(AnalysisResult::Video { output_uri }) => println!("{output_uri}"),
        None => {
            let reason = workspace
                .state()
                .last_error()
                .unwrap_or("analysis failed")
                .to_string();
            return Err(reason.into());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("eidos=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "eidos=info".parse().unwrap()),
            ),
        )
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
