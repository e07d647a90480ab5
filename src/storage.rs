// SPDX-License-Identifier: MPL-2.0

//! Gallery image loading and picking

use crate::app::frame_processor::{QrDecoder, QrDetection, decode_with_watchdog};
use crate::backends::camera::types::CameraFrame;
use crate::constants::file_formats;
use crate::errors::GalleryError;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Picture directory used as the picker's starting point
pub fn picture_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load an image file as a luminance frame
///
/// The file is read asynchronously and decoded on the blocking pool.
pub async fn load_image_frame(path: &Path) -> Result<CameraFrame, GalleryError> {
    let load_error = |reason: String| GalleryError::Load {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| load_error(e.to_string()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Loaded gallery image");

    // Decode image to luminance in blocking task
    let decoded = tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes).map(|img| img.to_luma8())
    })
    .await
    .map_err(|e| load_error(e.to_string()))?;

    let luma = decoded.map_err(|e| load_error(e.to_string()))?;
    Ok(CameraFrame::from_luma_image(luma))
}

/// Load an image file and decode it once
pub async fn decode_image_file(
    path: &Path,
    decoder: Arc<dyn QrDecoder>,
    timeout: Option<Duration>,
) -> Result<Vec<QrDetection>, GalleryError> {
    let frame = load_image_frame(path).await?;
    info!(
        path = %path.display(),
        width = frame.width,
        height = frame.height,
        "Scanning gallery image"
    );
    let detections = decode_with_watchdog(decoder, Arc::new(frame), timeout).await?;
    Ok(detections)
}

/// Source of a user-chosen image path
pub trait ImagePicker: Send + Sync {
    /// Resolves to `None` when the user cancels
    fn pick_image(&self) -> BoxFuture<'static, Option<PathBuf>>;
}

/// Portal file chooser filtered to image files
#[derive(Debug, Clone)]
pub struct RfdImagePicker {
    start_dir: PathBuf,
}

impl Default for RfdImagePicker {
    fn default() -> Self {
        Self {
            start_dir: picture_directory(),
        }
    }
}

impl ImagePicker for RfdImagePicker {
    fn pick_image(&self) -> BoxFuture<'static, Option<PathBuf>> {
        let start_dir = self.start_dir.clone();
        Box::pin(async move {
            let handle = rfd::AsyncFileDialog::new()
                .set_title("Select an image with a QR code")
                .add_filter("Images", file_formats::IMAGE_EXTENSIONS)
                .set_directory(&start_dir)
                .pick_file()
                .await?;
            Some(handle.path().to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::frame_processor::QrDetector;
    use crate::backends::camera::types::PixelFormat;

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let result = load_image_frame(Path::new("/nonexistent/qr.png")).await;
        assert!(matches!(result, Err(GalleryError::Load { .. })));
    }

    #[tokio::test]
    async fn test_garbage_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        let result = decode_image_file(&path, Arc::new(QrDetector::new()), None).await;
        assert!(matches!(result, Err(GalleryError::Load { .. })));
    }

    #[tokio::test]
    async fn test_blank_image_has_no_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        image::GrayImage::from_pixel(32, 32, image::Luma([255u8]))
            .save(&path)
            .unwrap();

        let frame = load_image_frame(&path).await.unwrap();
        assert_eq!(frame.format, PixelFormat::Gray8);
        assert_eq!((frame.width, frame.height), (32, 32));

        let detections = decode_image_file(&path, Arc::new(QrDetector::new()), None)
            .await
            .unwrap();
        assert!(detections.is_empty());
    }
}
