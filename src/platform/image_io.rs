// Dasa Sandbox - platform/image_io.rs
//
// Image file reading and decoding via the `image` crate. Decoding happens
// wherever the bytes arrive (file picker on the UI thread, generated images
// on the job worker); the UI only ever sees ready RGBA buffers.

use crate::core::model::{ImageInput, PixelBuffer};
use crate::util::constants;
use crate::util::error::ImageError;
use image::error::{LimitError, LimitErrorKind};
use std::path::Path;
use std::sync::Arc;

/// Decode encoded image bytes (PNG, JPEG, GIF, BMP, WebP) into RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, ImageError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| ImageError::Decode { source })?;
    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba(width, height, rgba.into_raw()).ok_or_else(|| ImageError::Decode {
        source: image::ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)),
    })
}

/// Read an image file for OCR upload.
///
/// The file must be within the size cap. The original bytes are kept for
/// upload. Formats the local decoder cannot read (TIFF, PDF) are still
/// accepted, just without a preview; the OCR service decides what it takes.
pub fn load_image_file(path: &Path) -> Result<ImageInput, ImageError> {
    let io_err = |source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > constants::MAX_IMAGE_FILE_BYTES {
        return Err(ImageError::TooLarge {
            path: path.to_path_buf(),
            size,
            max_size: constants::MAX_IMAGE_FILE_BYTES,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    let preview = match decode_image(&bytes) {
        Ok(preview) => Some(preview),
        Err(e) => {
            tracing::debug!(file = %path.display(), error = %e, "No local preview for image");
            None
        }
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    tracing::debug!(
        file = %path.display(),
        bytes = bytes.len(),
        preview = ?preview.as_ref().map(|p| p.size()),
        "Image loaded"
    );

    Ok(ImageInput {
        file_name,
        bytes: Arc::from(bytes),
        preview,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    /// A small encoded PNG for tests that need real image bytes.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let buf = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!(buf.size(), [3, 2]);
        assert_eq!(&buf.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }));
    }

    #[test]
    fn test_load_image_file_keeps_original_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        let bytes = png_bytes(4, 4);
        std::fs::write(&path, &bytes).unwrap();

        let input = load_image_file(&path).unwrap();
        assert_eq!(input.file_name, "receipt.png");
        assert_eq!(&input.bytes[..], &bytes[..]);
        assert!(input.preview.is_some());
    }

    #[test]
    fn test_undecodable_file_is_attached_without_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.tiff");
        let bytes = b"II*\0 not something the local decoder reads".to_vec();
        std::fs::write(&path, &bytes).unwrap();

        let input = load_image_file(&path).unwrap();
        assert_eq!(input.file_name, "scan.tiff");
        assert_eq!(&input.bytes[..], &bytes[..]);
        assert!(input.preview.is_none());
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(constants::MAX_IMAGE_FILE_BYTES + 1).unwrap();

        let err = load_image_file(&path).unwrap_err();
        assert!(matches!(err, ImageError::TooLarge { .. }));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image_file(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, ImageError::Io { .. }));
    }
}
