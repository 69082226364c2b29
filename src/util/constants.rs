// Dasa Sandbox - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.
// Config validation ranges live here so config.rs and the UI agree.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Dasa Sandbox";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "DasaSandbox";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Demo registry
// =============================================================================

/// Registry id of the AI tools demo (first tab, selected at startup).
pub const DEMO_AI_TOOLS: &str = "ai-tools";

/// Registry id of the screen capture demo.
pub const DEMO_SCREEN_CAPTURE: &str = "screen-capture";

// =============================================================================
// Screen capture
// =============================================================================

/// Default interval between preview frames grabbed by the capture pump (ms).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 200;

/// Minimum configurable frame interval (ms), roughly 60 fps.
pub const MIN_FRAME_INTERVAL_MS: u64 = 16;

/// Maximum configurable frame interval (ms).
pub const MAX_FRAME_INTERVAL_MS: u64 = 2_000;

/// How often the frame pump checks its stop flag while sleeping (ms).
pub const CAPTURE_STOP_CHECK_INTERVAL_MS: u64 = 20;

/// Consecutive failed grabs after which a track is considered ended.
pub const MAX_CONSECUTIVE_CAPTURE_FAILURES: u32 = 5;

// =============================================================================
// AI tools
// =============================================================================

/// OCR.space parse endpoint.
pub const DEFAULT_OCR_URL: &str = "https://api.ocr.space/parse/image";

/// OCR.space public test key.
pub const DEFAULT_OCR_API_KEY: &str = "K84952735488957";

/// Hugging Face inference endpoint for text-to-image.
pub const DEFAULT_IMAGE_URL: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-2";

/// Hugging Face inference endpoint for summarisation.
pub const DEFAULT_SUMMARIZE_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

/// LibreTranslate-compatible translation endpoint.
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.argosopentech.com/translate";

/// Source language sent with translation requests.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "auto";

/// Target language sent with translation requests.
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

/// File extensions offered by the OCR image picker. TIFF and PDF upload
/// without a local preview.
pub const IMAGE_FILE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "pdf"];

/// Largest image file accepted for OCR upload. OCR.space rejects anything
/// above 1 MB on the free tier; the local cap only guards memory.
pub const MAX_IMAGE_FILE_BYTES: u64 = 20 * 1024 * 1024; // 20 MB

/// Maximum number of bytes of an error response body kept for diagnostics.
pub const MAX_ERROR_BODY_PREVIEW: usize = 512;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

/// Default width of the log panel on the right-hand side (points).
pub const DEFAULT_LOG_PANEL_WIDTH: f32 = 320.0;

/// Minimum configurable log panel width (points).
pub const MIN_LOG_PANEL_WIDTH: f32 = 200.0;

/// Maximum configurable log panel width (points).
pub const MAX_LOG_PANEL_WIDTH: f32 = 800.0;

/// Repaint cadence while an AI job is outstanding (ms).
pub const JOB_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of user text included in debug output.
pub const DEBUG_MAX_TEXT_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
