use crate::error::{BackupError, Result};
use crate::grid::TileCoord;
use crate::transport::Transport;

/// URL of one tile on the tile server
pub fn tile_url(base_url: &str, tile: TileCoord) -> String {
    format!("{}/{}/{}.png", base_url.trim_end_matches('/'), tile.x, tile.y)
}

/// Download every tile in order, one request at a time.
///
/// The first failing tile aborts the whole download.
pub async fn download_tiles<T: Transport>(
    transport: &T,
    base_url: &str,
    tiles: &[TileCoord],
) -> Result<Vec<Vec<u8>>> {
    info!("[Downloading] {} chunks...", tiles.len());

    let mut buffers = Vec::with_capacity(tiles.len());
    for &tile in tiles {
        let url = tile_url(base_url, tile);
        debug!("Downloading {}", url);
        let bytes = transport
            .get_bytes(&url)
            .await
            .map_err(|source| BackupError::Download { tile, source })?;
        buffers.push(bytes);
    }

    info!("[Completed downloading] {} chunks.", tiles.len());
    Ok(buffers)
}
