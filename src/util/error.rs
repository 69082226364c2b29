// Dasa Sandbox - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Errors stay typed until the panel boundary, where they are collapsed
// into a single human-readable log line.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all sandbox operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SandboxError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Screen capture could not be started.
    Capture(CaptureError),

    /// A remote AI service call failed.
    Service(ServiceError),

    /// An image could not be read or decoded.
    Image(ImageError),
}

impl fmt::Display for SandboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Capture(e) => write!(f, "Capture error: {e}"),
            Self::Service(e) => write!(f, "Service error: {e}"),
            Self::Image(e) => write!(f, "Image error: {e}"),
        }
    }
}

impl std::error::Error for SandboxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Capture(e) => Some(e),
            Self::Service(e) => Some(e),
            Self::Image(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for SandboxError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Capture errors
// ---------------------------------------------------------------------------

/// Errors raised while acquiring a screen capture stream.
#[derive(Debug)]
pub enum CaptureError {
    /// The request asked for something the backend cannot provide
    /// (e.g. audio, or neither audio nor video).
    Unsupported { reason: String },

    /// No capturable display was found.
    NoSource,

    /// The platform refused the request (permissions, user cancelled).
    Denied { message: String },

    /// Any other backend failure.
    Backend { message: String },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { reason } => write!(f, "NotSupportedError: {reason}"),
            Self::NoSource => write!(f, "NotFoundError: no display available to capture"),
            Self::Denied { message } => write!(f, "NotAllowedError: {message}"),
            Self::Backend { message } => write!(f, "AbortError: {message}"),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<CaptureError> for SandboxError {
    fn from(e: CaptureError) -> Self {
        Self::Capture(e)
    }
}

// ---------------------------------------------------------------------------
// Service errors
// ---------------------------------------------------------------------------

/// Errors raised by a remote AI service call.
///
/// `operation` is a short label such as "ocr" or "translate" used in
/// diagnostics; it never carries request content or credentials.
#[derive(Debug)]
pub enum ServiceError {
    /// The request could not be sent or the response could not be read.
    Transport {
        operation: &'static str,
        source: reqwest::Error,
    },

    /// The service answered with a non-success HTTP status.
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The response body was not the JSON shape the integration expects.
    Decode {
        operation: &'static str,
        source: serde_json::Error,
    },

    /// The service reported a processing error in an otherwise valid response.
    Rejected {
        operation: &'static str,
        message: String,
    },

    /// The response was well-formed but carried no usable result.
    EmptyResult { operation: &'static str },
}

impl ServiceError {
    /// The operation label the error belongs to.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Rejected { operation, .. }
            | Self::EmptyResult { operation } => operation,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { operation, source } => {
                write!(f, "{operation}: request failed: {source}")
            }
            Self::Status {
                operation,
                status,
                body,
            } => {
                if body.is_empty() {
                    write!(f, "{operation}: service returned HTTP {status}")
                } else {
                    write!(f, "{operation}: service returned HTTP {status}: {body}")
                }
            }
            Self::Decode { operation, source } => {
                write!(f, "{operation}: malformed response: {source}")
            }
            Self::Rejected { operation, message } => write!(f, "{operation}: {message}"),
            Self::EmptyResult { operation } => {
                write!(f, "{operation}: no result received from the service")
            }
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ServiceError> for SandboxError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

// ---------------------------------------------------------------------------
// Image errors
// ---------------------------------------------------------------------------

/// Errors reading or decoding an image.
#[derive(Debug)]
pub enum ImageError {
    /// The image file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The file exceeds the accepted size.
    TooLarge { path: PathBuf, size: u64, max_size: u64 },

    /// The bytes are not a supported image format.
    Decode { source: image::ImageError },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Cannot read image '{}': {source}", path.display())
            }
            Self::TooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Image '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Decode { source } => write!(f, "Cannot decode image: {source}"),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ImageError> for SandboxError {
    fn from(e: ImageError) -> Self {
        Self::Image(e)
    }
}

/// Convenience type alias for sandbox results.
pub type Result<T> = std::result::Result<T, SandboxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_service_error_operation_label() {
        let err = ServiceError::EmptyResult {
            operation: "summarize",
        };
        assert_eq!(err.operation(), "summarize");
        assert_eq!(
            err.to_string(),
            "summarize: no result received from the service"
        );
    }

    #[test]
    fn test_status_error_omits_empty_body() {
        let err = ServiceError::Status {
            operation: "text-to-image",
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "text-to-image: service returned HTTP 503");
    }

    #[test]
    fn test_sandbox_error_preserves_source_chain() {
        let io = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: SandboxError = ConfigError::Io {
            path: PathBuf::from("config.toml"),
            source: io,
        }
        .into();
        let config = err.source().expect("config error source");
        assert!(config.source().is_some(), "io error must remain in the chain");
    }

    #[test]
    fn test_capture_error_display_names_failure_class() {
        let err = CaptureError::Denied {
            message: "Permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "NotAllowedError: Permission denied");
    }
}
