#[macro_use] extern crate log;

pub mod composite;
pub mod config;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod publish;
pub mod transport;

use chrono::Utc;
use std::error::Error as _;
use std::path::PathBuf;
use std::time::Duration;

pub use config::BackupConfig;
pub use error::{BackupError, Result};
pub use grid::{plan_tiles, GridBounds, TileCoord};
pub use transport::{ReqwestTransport, Transport};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub path: PathBuf,
    pub tiles: usize,
    pub bytes: usize,
}

/// Download, stitch, save and publish the configured region once.
///
/// Each step finishes before the next starts and the first error ends the run.
pub async fn run_backup<T: Transport>(transport: &T, config: &BackupConfig) -> Result<BackupReport> {
    info!("Starting tile backup...");

    let tiles = plan_tiles(&config.bounds)?;
    let buffers = fetch::download_tiles(transport, &config.base_url, &tiles).await?;
    let png = composite::stitch_tiles(&buffers, config.bounds.cols())?;

    let taken_at = Utc::now();
    let file_name = publish::backup_file_name(taken_at);
    let path = publish::save_backup(&config.output_dir, &file_name, &png).await?;

    let bytes = png.len();
    let message = publish::backup_message(&file_name, png, taken_at);
    publish::publish_backup(transport, config.webhook_url.as_deref(), &message).await?;

    info!("Backup completed successfully");
    Ok(BackupReport {
        path,
        tiles: tiles.len(),
        bytes,
    })
}

/// Pause before the process exits so pending log output is written
pub const EXIT_DELAY: Duration = Duration::from_millis(50);

/// Log how the run ended and pick the process exit code: 0 on success, 1 on
/// any failure.
pub fn exit_code(result: &Result<BackupReport>) -> i32 {
    match result {
        Ok(report) => {
            info!(
                "Backup run finished: {} tiles, {} bytes at {}",
                report.tiles,
                report.bytes,
                report.path.display()
            );
            0
        }
        Err(e) => {
            error!("Backup run failed ({}): {}", e.kind(), e);
            let mut cause = e.source();
            while let Some(err) = cause {
                error!("  caused by: {}", err);
                cause = err.source();
            }
            1
        }
    }
}
