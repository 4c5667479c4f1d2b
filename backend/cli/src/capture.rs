//! Image capture: the two photos a verification starts from.
//!
//! The blobs are carried through untouched. Only the file extension is
//! checked, the same way a browser file picker filters on `image/*`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use tracing::info;

/// One captured photo.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub path: PathBuf,
    pub mime_type: &'static str,
    pub data: Bytes,
}

/// Packaging and pill photos for one verification.
#[derive(Debug, Clone)]
pub struct CapturedImages {
    pub packaging: ImageBlob,
    pub pill: ImageBlob,
}

impl CapturedImages {
    pub fn total_bytes(&self) -> usize {
        self.packaging.data.len() + self.pill.data.len()
    }
}

/// Detect an image MIME type by file extension.
pub fn detect_image_mime(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "tiff" | "tif" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

async fn read_image(label: &str, path: &Path) -> Result<ImageBlob> {
    let Some(mime_type) = detect_image_mime(path) else {
        bail!("{label} image {} is not a supported image file", path.display());
    };

    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {label} image: {}", path.display()))?;
    if data.is_empty() {
        bail!("{label} image {} is empty", path.display());
    }

    Ok(ImageBlob {
        path: path.to_path_buf(),
        mime_type,
        data: Bytes::from(data),
    })
}

/// Read both photos. Both are required.
pub async fn capture_images(packaging: &Path, pill: &Path) -> Result<CapturedImages> {
    let images = CapturedImages {
        packaging: read_image("packaging", packaging).await?,
        pill: read_image("pill", pill).await?,
    };

    info!(
        packaging = %images.packaging.path.display(),
        packaging_mime = images.packaging.mime_type,
        pill = %images.pill.path.display(),
        pill_mime = images.pill.mime_type,
        total_bytes = images.total_bytes(),
        "Captured images"
    );

    Ok(images)
}
