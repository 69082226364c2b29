// Dasa Sandbox - core/tools.rs
//
// The four AI tool kinds as a closed tagged variant, the capability trait
// the AI tools panel dispatches through, and the per-kind failure wording.
//
// A `ToolRequest` can only be built from validated input, so a request that
// reaches `dispatch` is always sendable. `dispatch` is an exhaustive match:
// adding a kind without a handler does not compile.

use crate::core::model::{GeneratedImage, ImageInput};
use crate::util::error::ServiceError;
use chrono::{DateTime, Local};

// =============================================================================
// ToolKind
// =============================================================================

/// One of the four fixed AI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Ocr,
    TextToImage,
    Summarize,
    Translate,
}

impl ToolKind {
    /// All kinds in card display order.
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Ocr,
            ToolKind::TextToImage,
            ToolKind::Summarize,
            ToolKind::Translate,
        ]
    }

    /// Stable identifier used in log lines.
    pub fn id(&self) -> &'static str {
        match self {
            ToolKind::Ocr => "ocr",
            ToolKind::TextToImage => "text-to-image",
            ToolKind::Summarize => "summarize",
            ToolKind::Translate => "translate",
        }
    }

    /// Card title.
    pub fn title(&self) -> &'static str {
        match self {
            ToolKind::Ocr => "Image to Text",
            ToolKind::TextToImage => "Text to Image",
            ToolKind::Summarize => "Text Summarizer",
            ToolKind::Translate => "AI Translator",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::Ocr => "Extract text from images using the OCR.space API",
            ToolKind::TextToImage => "Generate images from text descriptions using Stable Diffusion",
            ToolKind::Summarize => "Summarize long texts using BART via the inference API",
            ToolKind::Translate => "Translate text using a LibreTranslate server",
        }
    }

    /// Heading of the result card.
    pub fn result_title(&self) -> &'static str {
        match self {
            ToolKind::Ocr => "Extracted Text",
            ToolKind::TextToImage => "Generated Image",
            ToolKind::Summarize => "Summary",
            ToolKind::Translate => "Translation",
        }
    }

    /// Placeholder for the text input; `None` for image-input kinds.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ToolKind::Ocr => None,
            ToolKind::TextToImage => Some("Describe the image you want to generate..."),
            ToolKind::Summarize => Some("Enter the text you want to summarize..."),
            ToolKind::Translate => Some("Enter the text you want to translate..."),
        }
    }

    /// Status line shown while a request is outstanding.
    pub fn progress_text(&self) -> &'static str {
        match self {
            ToolKind::Ocr => "Extracting text from image...",
            ToolKind::TextToImage => "Generating image from text...",
            ToolKind::Summarize => "Summarizing text...",
            ToolKind::Translate => "Translating text...",
        }
    }

    /// Whether the kind takes an image instead of text.
    pub fn takes_image(&self) -> bool {
        matches!(self, ToolKind::Ocr)
    }

    /// The single user-facing message for a failed call of this kind.
    /// Service detail is only carried through for OCR, whose provider
    /// returns readable processing errors.
    pub fn failure_message(&self, error: &ServiceError) -> String {
        match self {
            ToolKind::Ocr => format!("OCR processing failed: {}", ocr_detail(error)),
            ToolKind::TextToImage => "Image generation failed".to_string(),
            ToolKind::Summarize => "No summary received from the service".to_string(),
            ToolKind::Translate => "No translation received from the service".to_string(),
        }
    }
}

fn ocr_detail(error: &ServiceError) -> String {
    match error {
        ServiceError::Rejected { message, .. } => message.clone(),
        ServiceError::EmptyResult { .. } => "Failed to extract text from image".to_string(),
        ServiceError::Status { status, .. } => format!("HTTP {status}"),
        ServiceError::Transport { source, .. } => source.to_string(),
        ServiceError::Decode { .. } => "Unexpected response from the service".to_string(),
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// =============================================================================
// Requests and validation
// =============================================================================

/// A validated, dispatchable request. Each variant carries its own input.
#[derive(Debug, Clone)]
pub enum ToolRequest {
    Ocr(ImageInput),
    TextToImage { prompt: String },
    Summarize { text: String },
    Translate {
        text: String,
        source: String,
        target: String,
    },
}

/// Input rejected before any call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingImage,
    BlankText,
}

impl ValidationError {
    /// The log line for the rejection.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::MissingImage => "Please upload an image first",
            ValidationError::BlankText => "Please enter some text first",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Languages sent with translation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationLanguages {
    pub source: String,
    pub target: String,
}

impl Default for TranslationLanguages {
    fn default() -> Self {
        Self {
            source: crate::util::constants::DEFAULT_SOURCE_LANGUAGE.to_string(),
            target: crate::util::constants::DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

impl ToolRequest {
    /// Build a request from the panel's current inputs.
    ///
    /// OCR requires an attached image; every other kind requires text that is
    /// not blank after trimming. Text is sent as typed (untrimmed).
    pub fn build(
        kind: ToolKind,
        text: &str,
        image: Option<&ImageInput>,
        languages: &TranslationLanguages,
    ) -> Result<ToolRequest, ValidationError> {
        let text_input = || {
            if text.trim().is_empty() {
                Err(ValidationError::BlankText)
            } else {
                Ok(text.to_string())
            }
        };

        match kind {
            ToolKind::Ocr => image
                .cloned()
                .map(ToolRequest::Ocr)
                .ok_or(ValidationError::MissingImage),
            ToolKind::TextToImage => Ok(ToolRequest::TextToImage {
                prompt: text_input()?,
            }),
            ToolKind::Summarize => Ok(ToolRequest::Summarize { text: text_input()? }),
            ToolKind::Translate => Ok(ToolRequest::Translate {
                text: text_input()?,
                source: languages.source.clone(),
                target: languages.target.clone(),
            }),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolRequest::Ocr(_) => ToolKind::Ocr,
            ToolRequest::TextToImage { .. } => ToolKind::TextToImage,
            ToolRequest::Summarize { .. } => ToolKind::Summarize,
            ToolRequest::Translate { .. } => ToolKind::Translate,
        }
    }

    /// What the user submitted, for the result card.
    pub fn original_input(&self) -> OriginalInput {
        match self {
            ToolRequest::Ocr(image) => OriginalInput::Image(image.clone()),
            ToolRequest::TextToImage { prompt } => OriginalInput::Text(prompt.clone()),
            ToolRequest::Summarize { text } | ToolRequest::Translate { text, .. } => {
                OriginalInput::Text(text.clone())
            }
        }
    }
}

// =============================================================================
// Capability and dispatch
// =============================================================================

/// The four remote operations behind the AI tools panel.
///
/// Implementations block; callers run them off the UI thread. Providers are
/// swappable: the HTTP implementation lives in the platform layer and tests
/// substitute fakes.
pub trait AiService: Send + Sync {
    fn extract_text(&self, image: &ImageInput) -> Result<String, ServiceError>;

    fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ServiceError>;

    fn summarize(&self, text: &str) -> Result<String, ServiceError>;

    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError>;
}

/// Successful output of one request.
#[derive(Debug, Clone)]
pub enum ToolOutput {
    Text(String),
    Image(GeneratedImage),
}

/// Run `request` against `service`. Exactly one service call per invocation.
pub fn dispatch(service: &dyn AiService, request: &ToolRequest) -> Result<ToolOutput, ServiceError> {
    match request {
        ToolRequest::Ocr(image) => service.extract_text(image).map(ToolOutput::Text),
        ToolRequest::TextToImage { prompt } => service.generate_image(prompt).map(ToolOutput::Image),
        ToolRequest::Summarize { text } => service.summarize(text).map(ToolOutput::Text),
        ToolRequest::Translate {
            text,
            source,
            target,
        } => service.translate(text, source, target).map(ToolOutput::Text),
    }
}

// =============================================================================
// Result
// =============================================================================

/// What the user submitted.
#[derive(Debug, Clone)]
pub enum OriginalInput {
    Text(String),
    Image(ImageInput),
}

/// Outcome of a settled request.
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    Success(ToolOutput),
    Error(String),
}

/// The result displayed by the AI tools panel. Replaced, never accumulated.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub kind: ToolKind,
    pub outcome: ToolOutcome,
    pub original_input: OriginalInput,
    pub timestamp: DateTime<Local>,
}

impl ToolResult {
    /// Settle a request: successes carry their output, failures collapse to
    /// the kind's uniform message.
    pub fn settle(request: &ToolRequest, result: Result<ToolOutput, ServiceError>) -> Self {
        let kind = request.kind();
        let outcome = match result {
            Ok(output) => ToolOutcome::Success(output),
            Err(e) => ToolOutcome::Error(kind.failure_message(&e)),
        };
        Self {
            kind,
            outcome,
            original_input: request.original_input(),
            timestamp: Local::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success(_))
    }

    /// Error text, if the request failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Error(msg) => Some(msg),
            ToolOutcome::Success(_) => None,
        }
    }

    /// Text payload, if the request produced text.
    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Success(ToolOutput::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Image payload, if the request produced an image.
    pub fn image(&self) -> Option<&GeneratedImage> {
        match &self.outcome {
            ToolOutcome::Success(ToolOutput::Image(img)) => Some(img),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn image() -> ImageInput {
        ImageInput {
            file_name: "scan.png".to_string(),
            bytes: Arc::from(vec![1u8, 2, 3]),
            preview: None,
        }
    }

    /// Records which operation was called and with what.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl AiService for Recorder {
        fn extract_text(&self, image: &ImageInput) -> Result<String, ServiceError> {
            self.calls.lock().unwrap().push(format!("ocr:{}", image.file_name));
            Ok("text".to_string())
        }
        fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ServiceError> {
            self.calls.lock().unwrap().push(format!("image:{prompt}"));
            Ok(GeneratedImage {
                bytes: Arc::from(vec![9u8]),
                content_type: None,
                preview: None,
            })
        }
        fn summarize(&self, text: &str) -> Result<String, ServiceError> {
            self.calls.lock().unwrap().push(format!("summarize:{text}"));
            Err(ServiceError::EmptyResult {
                operation: "summarize",
            })
        }
        fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("translate:{text}:{source}:{target}"));
            Ok("hola".to_string())
        }
    }

    #[test]
    fn test_ocr_without_image_is_rejected() {
        let err = ToolRequest::build(ToolKind::Ocr, "ignored", None, &Default::default())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingImage);
        assert!(err.message().contains("upload an image"));
    }

    #[test]
    fn test_blank_text_is_rejected_for_text_kinds() {
        for kind in [ToolKind::TextToImage, ToolKind::Summarize, ToolKind::Translate] {
            let err = ToolRequest::build(kind, "  \n\t ", None, &Default::default()).unwrap_err();
            assert_eq!(err, ValidationError::BlankText, "{kind}");
            assert!(err.message().contains("enter some text"));
        }
    }

    #[test]
    fn test_translate_carries_default_languages() {
        let req =
            ToolRequest::build(ToolKind::Translate, "hallo", None, &Default::default()).unwrap();
        match req {
            ToolRequest::Translate {
                source, target, ..
            } => {
                assert_eq!(source, "auto");
                assert_eq!(target, "en");
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_calls_exactly_the_matching_operation() {
        let service = Recorder::default();
        let langs = TranslationLanguages::default();
        let img = image();
        let requests = [
            ToolRequest::build(ToolKind::Ocr, "", Some(&img), &langs).unwrap(),
            ToolRequest::build(ToolKind::TextToImage, "a cat", None, &langs).unwrap(),
            ToolRequest::build(ToolKind::Summarize, "long", None, &langs).unwrap(),
            ToolRequest::build(ToolKind::Translate, "hello", None, &langs).unwrap(),
        ];
        for req in &requests {
            let _ = dispatch(&service, req);
        }
        let calls = service.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "ocr:scan.png",
                "image:a cat",
                "summarize:long",
                "translate:hello:auto:en"
            ]
        );
    }

    #[test]
    fn test_settle_collapses_errors_to_uniform_message() {
        let service = Recorder::default();
        let req = ToolRequest::build(ToolKind::Summarize, "long", None, &Default::default())
            .unwrap();
        let result = ToolResult::settle(&req, dispatch(&service, &req));
        assert!(!result.is_success());
        assert_eq!(
            result.error_message(),
            Some("No summary received from the service")
        );
    }

    #[test]
    fn test_ocr_failure_keeps_provider_detail() {
        let err = ServiceError::Rejected {
            operation: "ocr",
            message: "File too large".to_string(),
        };
        assert_eq!(
            ToolKind::Ocr.failure_message(&err),
            "OCR processing failed: File too large"
        );
    }

    #[test]
    fn test_settle_success_exposes_payload() {
        let service = Recorder::default();
        let req = ToolRequest::build(ToolKind::Translate, "hello", None, &Default::default())
            .unwrap();
        let result = ToolResult::settle(&req, dispatch(&service, &req));
        assert_eq!(result.text(), Some("hola"));
        assert!(result.image().is_none());
        assert!(matches!(result.original_input, OriginalInput::Text(ref t) if t == "hello"));
    }
}
