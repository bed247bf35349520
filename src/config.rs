use crate::grid::GridBounds;
use std::env;
use std::path::PathBuf;

/// Environment variable holding the webhook endpoint
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";

pub const DEFAULT_BASE_URL: &str = "https://backend.wplace.live/files/s0/tiles/";
pub const DEFAULT_OUTPUT_DIR: &str = "./public/tiles/raw";

/// Everything one backup run needs to know
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Region to back up
    pub bounds: GridBounds,
    /// Tile server root; tiles live at `{base_url}/{x}/{y}.png`
    pub base_url: String,
    /// Directory the composite is written to
    pub output_dir: PathBuf,
    /// Webhook endpoint, checked right before publishing
    pub webhook_url: Option<String>,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            bounds: GridBounds::new(1520, 865, 1525, 867),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            webhook_url: None,
        }
    }
}

impl BackupConfig {
    /// Default region with the webhook taken from the environment
    pub fn from_env() -> Self {
        Self {
            webhook_url: env::var(WEBHOOK_ENV).ok(),
            ..Default::default()
        }
    }
}
