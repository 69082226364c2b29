// Dasa Sandbox - core/model.rs
//
// Shared image data types. Pure data definitions with no I/O, no UI,
// no platform dependencies.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// Pixel buffer
// =============================================================================

/// A decoded RGBA8 image.
///
/// `from_rgba` moves the pixels into an `Arc` once; after that, clones (the
/// pump thread's slot, the UI's copy of the latest frame) share the same
/// allocation. `serial` is unique per buffer within the process; the UI
/// re-uploads a texture only when it changes.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
    pub serial: u64,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 pixels. Returns `None` if the length does not match
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if rgba.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba: Arc::from(rgba),
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// `[width, height]` as `usize`, the shape egui expects.
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

// =============================================================================
// Tool inputs and outputs carrying images
// =============================================================================

/// An image attached as OCR input.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// File name shown in the UI and sent as the multipart file name.
    pub file_name: String,

    /// Raw encoded file bytes, uploaded unchanged.
    pub bytes: Arc<[u8]>,

    /// Decoded preview, when the bytes could be decoded locally.
    pub preview: Option<PixelBuffer>,
}

/// An image returned by the text-to-image service.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Raw encoded bytes as received.
    pub bytes: Arc<[u8]>,

    /// `Content-Type` reported by the service, if any.
    pub content_type: Option<String>,

    /// Decoded preview; `None` when the bytes could not be decoded.
    pub preview: Option<PixelBuffer>,
}
