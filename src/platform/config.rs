// Dasa Sandbox - platform/config.rs
//
// Platform directory resolution and config.toml loading with startup
// validation. Every value is checked against the named limits in
// util::constants; a bad value costs one warning and falls back to its
// default, it never stops the application.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::tools::TranslationLanguages;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for sandbox configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/dasasandbox/ or %APPDATA%\DasaSandbox\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml shape
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so an older binary can read a newer file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub ui: UiSection,
    pub capture: CaptureSection,
    pub ai: AiSection,
    pub logging: LoggingSection,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
    /// Width of the log panel in points.
    pub log_panel_width: Option<f32>,
}

/// `[capture]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CaptureSection {
    /// Interval between preview frames in ms.
    pub frame_interval_ms: Option<u64>,
}

/// `[ai]` config section. Endpoints and credentials of the remote services.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AiSection {
    pub ocr_url: Option<String>,
    pub ocr_api_key: Option<String>,
    pub image_url: Option<String>,
    pub summarize_url: Option<String>,
    pub translate_url: Option<String>,
    pub translate_api_key: Option<String>,
    pub hf_token: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path. Accepted but not yet written to.
    pub file: Option<String>,
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Endpoints and credentials for the AI services.
///
/// `Debug` is implemented by hand so keys never reach a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct AiEndpoints {
    pub ocr_url: String,
    pub ocr_api_key: String,
    pub image_url: String,
    pub summarize_url: String,
    pub translate_url: String,
    pub translate_api_key: Option<String>,
    pub hf_token: Option<String>,
}

impl Default for AiEndpoints {
    fn default() -> Self {
        Self {
            ocr_url: constants::DEFAULT_OCR_URL.to_string(),
            ocr_api_key: constants::DEFAULT_OCR_API_KEY.to_string(),
            image_url: constants::DEFAULT_IMAGE_URL.to_string(),
            summarize_url: constants::DEFAULT_SUMMARIZE_URL.to_string(),
            translate_url: constants::DEFAULT_TRANSLATE_URL.to_string(),
            translate_api_key: None,
            hf_token: None,
        }
    }
}

impl std::fmt::Debug for AiEndpoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiEndpoints")
            .field("ocr_url", &self.ocr_url)
            .field("image_url", &self.image_url)
            .field("summarize_url", &self.summarize_url)
            .field("translate_url", &self.translate_url)
            .field("translate_api_key", &self.translate_api_key.as_ref().map(|_| "<set>"))
            .field("hf_token", &self.hf_token.as_ref().map(|_| "<set>"))
            .finish_non_exhaustive()
    }
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,
    /// Width of the log panel in points.
    pub log_panel_width: f32,

    // -- Capture --
    pub frame_interval: Duration,

    // -- AI --
    pub endpoints: AiEndpoints,
    pub languages: TranslationLanguages,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_panel_width: constants::DEFAULT_LOG_PANEL_WIDTH,
            frame_interval: Duration::from_millis(constants::DEFAULT_FRAME_INTERVAL_MS),
            endpoints: AiEndpoints::default(),
            languages: TranslationLanguages::default(),
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with one warning.
pub fn load_config_file(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(source) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

/// Check each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    let mut out_of_range = |field: &str, value: String, expected: String, default: String| {
        let err = ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value,
            expected,
        };
        warnings.push(format!("{err}. Using default ({default})."));
    };

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => out_of_range(
                "ui.theme",
                other.to_string(),
                "\"dark\" or \"light\"".to_string(),
                "dark".to_string(),
            ),
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            out_of_range(
                "ui.font_size",
                size.to_string(),
                format!("{}-{}", constants::MIN_FONT_SIZE, constants::MAX_FONT_SIZE),
                constants::DEFAULT_FONT_SIZE.to_string(),
            );
        }
    }

    // -- UI: log_panel_width --
    if let Some(width) = raw.ui.log_panel_width {
        if (constants::MIN_LOG_PANEL_WIDTH..=constants::MAX_LOG_PANEL_WIDTH).contains(&width) {
            config.log_panel_width = width;
        } else {
            out_of_range(
                "ui.log_panel_width",
                width.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_LOG_PANEL_WIDTH,
                    constants::MAX_LOG_PANEL_WIDTH
                ),
                constants::DEFAULT_LOG_PANEL_WIDTH.to_string(),
            );
        }
    }

    // -- Capture: frame_interval_ms --
    if let Some(ms) = raw.capture.frame_interval_ms {
        if (constants::MIN_FRAME_INTERVAL_MS..=constants::MAX_FRAME_INTERVAL_MS).contains(&ms) {
            config.frame_interval = Duration::from_millis(ms);
        } else {
            out_of_range(
                "capture.frame_interval_ms",
                ms.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_FRAME_INTERVAL_MS,
                    constants::MAX_FRAME_INTERVAL_MS
                ),
                constants::DEFAULT_FRAME_INTERVAL_MS.to_string(),
            );
        }
    }

    // -- AI: endpoint URLs --
    let urls = [
        ("ai.ocr_url", raw.ai.ocr_url, &mut config.endpoints.ocr_url),
        ("ai.image_url", raw.ai.image_url, &mut config.endpoints.image_url),
        (
            "ai.summarize_url",
            raw.ai.summarize_url,
            &mut config.endpoints.summarize_url,
        ),
        (
            "ai.translate_url",
            raw.ai.translate_url,
            &mut config.endpoints.translate_url,
        ),
    ];
    for (field, value, slot) in urls {
        let Some(url) = value else { continue };
        if is_http_url(&url) {
            *slot = url;
        } else {
            let default = slot.clone();
            out_of_range(
                field,
                url,
                "an http:// or https:// URL".to_string(),
                default,
            );
        }
    }

    // -- AI: credentials (empty string means unset) --
    if let Some(key) = raw.ai.ocr_api_key.filter(|k| !k.trim().is_empty()) {
        config.endpoints.ocr_api_key = key;
    }
    config.endpoints.translate_api_key = raw.ai.translate_api_key.filter(|k| !k.trim().is_empty());
    config.endpoints.hf_token = raw.ai.hf_token.filter(|k| !k.trim().is_empty());

    // -- AI: languages --
    let langs = [
        (
            "ai.source_language",
            raw.ai.source_language,
            &mut config.languages.source,
        ),
        (
            "ai.target_language",
            raw.ai.target_language,
            &mut config.languages.target,
        ),
    ];
    for (field, value, slot) in langs {
        let Some(code) = value else { continue };
        if is_language_code(&code) {
            *slot = code;
        } else {
            let default = slot.clone();
            out_of_range(
                field,
                code,
                "a language code such as \"en\" or \"auto\"".to_string(),
                default,
            );
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            out_of_range(
                "logging.level",
                level.clone(),
                "error, warn, info, debug, trace".to_string(),
                constants::DEFAULT_LOG_LEVEL.to_string(),
            );
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    config
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

fn is_language_code(code: &str) -> bool {
    (2..=8).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_file_is_read_from_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PlatformPaths {
            config_dir: dir.path().to_path_buf(),
        };
        assert_eq!(paths.config_file(), dir.path().join("config.toml"));
        std::fs::write(paths.config_file(), "[ui]\ntheme = \"light\"\n").unwrap();

        let (config, warnings) = load_config_file(&paths.config_file());
        assert!(warnings.is_empty());
        assert!(!config.dark_mode);
    }

    #[test]
    fn test_missing_file_gives_defaults_without_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config_file(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert!(config.dark_mode);
        assert_eq!(config.endpoints, AiEndpoints::default());
        assert_eq!(config.languages.source, "auto");
        assert_eq!(config.languages.target, "en");
    }

    #[test]
    fn test_valid_values_are_applied() {
        let file = write_config(
            r#"
            [ui]
            theme = "Light"
            font_size = 16.0
            log_panel_width = 400.0

            [capture]
            frame_interval_ms = 500

            [ai]
            summarize_url = "http://127.0.0.1:9000/summarize"
            hf_token = "hf_secret"
            target_language = "de"

            [logging]
            level = "DEBUG"
            "#,
        );
        let (config, warnings) = load_config_file(file.path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert!(!config.dark_mode);
        assert_eq!(config.font_size, 16.0);
        assert_eq!(config.log_panel_width, 400.0);
        assert_eq!(config.frame_interval, Duration::from_millis(500));
        assert_eq!(config.endpoints.summarize_url, "http://127.0.0.1:9000/summarize");
        assert_eq!(config.endpoints.hf_token.as_deref(), Some("hf_secret"));
        assert_eq!(config.languages.target, "de");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_each_invalid_value_warns_once_and_falls_back() {
        let file = write_config(
            r#"
            [ui]
            theme = "sepia"
            font_size = 99.0

            [capture]
            frame_interval_ms = 1

            [ai]
            ocr_url = "ftp://example.com"
            source_language = "not a language"

            [logging]
            level = "loud"
            "#,
        );
        let (config, warnings) = load_config_file(file.path());
        assert_eq!(warnings.len(), 6, "warnings: {warnings:?}");
        assert!(config.dark_mode);
        assert_eq!(config.font_size, constants::DEFAULT_FONT_SIZE);
        assert_eq!(
            config.frame_interval,
            Duration::from_millis(constants::DEFAULT_FRAME_INTERVAL_MS)
        );
        assert_eq!(config.endpoints.ocr_url, constants::DEFAULT_OCR_URL);
        assert_eq!(config.languages.source, "auto");
        assert!(config.log_level.is_none());
        assert!(warnings.iter().any(|w| w.contains("capture.frame_interval_ms")));
    }

    #[test]
    fn test_malformed_toml_gives_defaults_and_one_warning() {
        let file = write_config("[ui\ntheme = ");
        let (config, warnings) = load_config_file(file.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
        assert!(config.dark_mode);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let file = write_config("[future]\nshiny = true\n[ui]\nfancy = 1\n");
        let (_, warnings) = load_config_file(file.path());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_blank_credentials_are_unset() {
        let file = write_config("[ai]\nhf_token = \"  \"\nocr_api_key = \"\"\n");
        let (config, _) = load_config_file(file.path());
        assert!(config.endpoints.hf_token.is_none());
        assert_eq!(config.endpoints.ocr_api_key, constants::DEFAULT_OCR_API_KEY);
    }

    #[test]
    fn test_endpoint_debug_hides_secrets() {
        let endpoints = AiEndpoints {
            hf_token: Some("hf_very_secret".to_string()),
            ..AiEndpoints::default()
        };
        let rendered = format!("{endpoints:?}");
        assert!(!rendered.contains("hf_very_secret"));
        assert!(!rendered.contains(constants::DEFAULT_OCR_API_KEY));
    }
}
