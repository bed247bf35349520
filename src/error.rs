//! Error types for the tile backup pipeline.

use crate::grid::TileCoord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while backing up the tile region.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("invalid grid: corners ({x1},{y1})-({x2},{y2}) are not ordered")]
    InvalidGrid { x1: u32, y1: u32, x2: u32, y2: u32 },

    #[error("failed to fetch tile {tile}")]
    Download {
        tile: TileCoord,
        #[source]
        source: anyhow::Error,
    },

    #[error("no tiles to composite")]
    NoTiles,

    #[error("tile {index} is {}x{}, expected {}x{}", actual.0, actual.1, expected.0, expected.1)]
    TileSizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("composite error: {0}")]
    Composite(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to write backup to {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} environment variable is not set", crate::config::WEBHOOK_ENV)]
    MissingWebhook,

    #[error("failed to send to webhook")]
    Publish(#[source] anyhow::Error),
}

impl BackupError {
    /// Short name of the pipeline stage that failed
    pub fn kind(&self) -> &'static str {
        match self {
            BackupError::InvalidGrid { .. } => "grid",
            BackupError::Download { .. } => "download",
            BackupError::NoTiles
            | BackupError::TileSizeMismatch { .. }
            | BackupError::Composite(_)
            | BackupError::Image(_) => "composite",
            BackupError::Persist { .. } => "persistence",
            BackupError::MissingWebhook => "configuration",
            BackupError::Publish(_) => "publish",
        }
    }
}

/// Result alias for backup operations.
pub type Result<T> = std::result::Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(BackupError::NoTiles.kind(), "composite");
        assert_eq!(BackupError::MissingWebhook.kind(), "configuration");
        assert_eq!(
            BackupError::MissingWebhook.to_string(),
            format!("{} environment variable is not set", crate::config::WEBHOOK_ENV)
        );
        assert_eq!(
            BackupError::Publish(anyhow::anyhow!("HTTP 500")).kind(),
            "publish"
        );
        let err = BackupError::Download {
            tile: TileCoord { x: 1, y: 2 },
            source: anyhow::anyhow!("HTTP 404"),
        };
        assert_eq!(err.kind(), "download");
        assert_eq!(err.to_string(), "failed to fetch tile 1/2");
    }

    #[test]
    fn test_mismatch_message() {
        let err = BackupError::TileSizeMismatch {
            index: 3,
            expected: (256, 256),
            actual: (128, 256),
        };
        assert_eq!(err.to_string(), "tile 3 is 128x256, expected 256x256");
    }
}
