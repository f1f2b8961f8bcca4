use clap::Parser;

/// Eidos — headless client for the Neural Bridge segmentation service.
#[derive(Parser, Debug)]
#[command(name = "eidos", version, about)]
pub struct Args {
    /// Image or video file to analyze.
    pub file: std::path::PathBuf,

    /// Free-text description of the target to segment.
    pub prompt: String,

    /// Base URL of the Neural Bridge service
    /// (default: $EIDOS_BRIDGE_URL or http://localhost:8000).
    #[arg(short = 'u', long)]
    pub bridge_url: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
