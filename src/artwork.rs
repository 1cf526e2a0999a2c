//! Official artwork: fetch, cache on disk, downsample for half-block cells

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::GenericImageView;
use image::imageops::FilterType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

/// Pixel size artwork is reduced to before it reaches the state
pub const ARTWORK_PIXELS: u32 = 40;
/// Alpha below this renders as background
const ALPHA_CUTOFF: u8 = 128;

#[derive(thiserror::Error, Debug)]
pub enum ArtworkError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Downsampled RGBA artwork
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Artwork {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA
    pub pixels: Vec<u8>,
}

impl Artwork {
    /// Opaque pixel colour, or `None` for transparent/out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = ((y * self.width + x) * 4) as usize;
        let rgba = self.pixels.get(index..index + 4)?;
        (rgba[3] >= ALPHA_CUTOFF).then_some((rgba[0], rgba[1], rgba[2]))
    }
}

/// Decode and shrink to fit `max_width` x `max_height`, keeping aspect ratio
pub fn decode_artwork(
    bytes: &[u8],
    max_width: u32,
    max_height: u32,
) -> Result<Artwork, ArtworkError> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = image.dimensions();
    let image = if width > max_width || height > max_height {
        image.resize(max_width, max_height, FilterType::Triangle)
    } else {
        image
    };
    let rgba = image.to_rgba8();
    Ok(Artwork {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

pub async fn load_artwork(url: &str) -> Result<Artwork, ArtworkError> {
    let bytes = fetch_bytes_cached(url).await?;
    match decode_artwork(&bytes, ARTWORK_PIXELS, ARTWORK_PIXELS) {
        Ok(artwork) => Ok(artwork),
        Err(err) => {
            let _ = fs::remove_file(cache_path(url)).await;
            Err(err)
        }
    }
}

async fn fetch_bytes_cached(url: &str) -> Result<Vec<u8>, ArtworkError> {
    let path = cache_path(url);
    if let Ok(bytes) = fs::read(&path).await {
        return Ok(bytes);
    }

    let response = http_client().get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?.to_vec();
    write_cache(&path, &bytes).await;
    Ok(bytes)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn cache_root() -> PathBuf {
    dirs_next::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gradedex")
        .join("artwork")
}

fn cache_path(url: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    cache_root().join(hex::encode(hasher.finalize()))
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    let _ = fs::write(path, bytes).await;
}
