// Dasa Sandbox - app/ai_tools.rs
//
// AI tools panel state: pick one of four tool kinds, supply text or an
// image, process once, show the result.
//
// State machine:
//   NoToolSelected -> ToolSelected(kind) -> Processing(kind) -> Settled(kind)
//   Settled -> Processing on a new request; any state -> ToolSelected(new)
//   on a kind switch, which discards input, result and the pending job.
//
// Every transition worth recording goes to the host through `LogSink`.

use crate::app::jobs::JobManager;
use crate::core::log::LogSink;
use crate::core::model::ImageInput;
use crate::core::tools::{AiService, ToolKind, ToolRequest, ToolResult, TranslationLanguages};
use crate::util::logging;
use std::sync::Arc;

/// Observable phase of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiToolsPhase {
    NoToolSelected,
    ToolSelected(ToolKind),
    Processing(ToolKind),
    Settled(ToolKind),
}

/// State of one mounted AI tools panel.
pub struct AiToolsPanel {
    selected: Option<ToolKind>,

    /// Free text for the text kinds. Bound to the text area.
    pub input_text: String,

    input_image: Option<ImageInput>,
    result: Option<ToolResult>,
    languages: TranslationLanguages,
    jobs: JobManager,
}

impl AiToolsPanel {
    pub fn new(service: Arc<dyn AiService>, languages: TranslationLanguages) -> Self {
        Self {
            selected: None,
            input_text: String::new(),
            input_image: None,
            result: None,
            languages,
            jobs: JobManager::new(service),
        }
    }

    pub fn phase(&self) -> AiToolsPhase {
        match self.selected {
            None => AiToolsPhase::NoToolSelected,
            Some(kind) if self.jobs.is_busy() => AiToolsPhase::Processing(kind),
            Some(kind) if self.result.is_some() => AiToolsPhase::Settled(kind),
            Some(kind) => AiToolsPhase::ToolSelected(kind),
        }
    }

    pub fn selected(&self) -> Option<ToolKind> {
        self.selected
    }

    pub fn input_image(&self) -> Option<&ImageInput> {
        self.input_image.as_ref()
    }

    pub fn result(&self) -> Option<&ToolResult> {
        self.result.as_ref()
    }

    /// `true` while a request is outstanding; the Process button is disabled.
    pub fn is_processing(&self) -> bool {
        self.jobs.is_busy()
    }

    /// Switch to `kind`, discarding input, result and any pending request.
    pub fn select_kind(&mut self, kind: ToolKind, log: &mut dyn LogSink) {
        self.jobs.abandon();
        self.selected = Some(kind);
        self.result = None;
        self.input_text.clear();
        self.input_image = None;
        log.info(format!("Selected tool: {}", kind.id()));
    }

    /// Attach an image for OCR. Replaces any earlier attachment.
    pub fn attach_image(&mut self, image: ImageInput, log: &mut dyn LogSink) {
        log.info(format!("Image uploaded: {}", image.file_name));
        self.input_image = Some(image);
    }

    /// Validate the current input and, if valid, start exactly one request.
    ///
    /// Does nothing with no kind selected or while a request is outstanding.
    pub fn process(&mut self, log: &mut dyn LogSink) {
        let Some(kind) = self.selected else {
            return;
        };
        if self.jobs.is_busy() {
            tracing::debug!(tool = kind.id(), "Process ignored; request already outstanding");
            return;
        }

        let request = match ToolRequest::build(
            kind,
            &self.input_text,
            self.input_image.as_ref(),
            &self.languages,
        ) {
            Ok(r) => r,
            Err(e) => {
                log.error(e.message());
                return;
            }
        };

        tracing::debug!(
            tool = kind.id(),
            input = %logging::preview(&self.input_text),
            "Dispatching AI request"
        );
        self.result = None;
        log.info(format!("Processing with {}...", kind.id()));
        self.jobs.start(request);
    }

    /// Deliver a settled request, if any. Returns `true` when the result
    /// changed so the caller can repaint.
    pub fn poll(&mut self, log: &mut dyn LogSink) -> bool {
        let Some(outcome) = self.jobs.poll() else {
            return false;
        };

        let result = ToolResult::settle(&outcome.request, outcome.result);
        match result.error_message() {
            None => log.success("Processing complete!"),
            Some(msg) => log.error(format!("Error: {msg}")),
        }
        self.result = Some(result);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log::{LogKind, LogList};
    use crate::core::model::GeneratedImage;
    use crate::util::error::ServiceError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl AiService for Counting {
        fn extract_text(&self, _image: &ImageInput) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("HELLO".to_string())
        }
        fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ServiceError::Status {
                operation: "text-to-image",
                status: 503,
                body: String::new(),
            })
        }
        fn summarize(&self, _text: &str) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("short".to_string())
        }
        fn translate(&self, _t: &str, _s: &str, _g: &str) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("translated".to_string())
        }
    }

    fn panel() -> (AiToolsPanel, Arc<Counting>) {
        let service = Arc::new(Counting::default());
        let panel = AiToolsPanel::new(service.clone(), TranslationLanguages::default());
        (panel, service)
    }

    fn settle(panel: &mut AiToolsPanel, logs: &mut LogList) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if panel.poll(logs) {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("request did not settle");
    }

    #[test]
    fn test_process_without_selection_is_noop() {
        let (mut panel, service) = panel();
        let mut logs = LogList::new();
        panel.process(&mut logs);
        assert!(logs.is_empty());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert_eq!(panel.phase(), AiToolsPhase::NoToolSelected);
    }

    #[test]
    fn test_select_logs_and_resets_input() {
        let (mut panel, _) = panel();
        let mut logs = LogList::new();
        panel.select_kind(ToolKind::Summarize, &mut logs);
        panel.input_text = "some text".to_string();
        panel.select_kind(ToolKind::Translate, &mut logs);

        assert!(panel.input_text.is_empty());
        assert_eq!(panel.phase(), AiToolsPhase::ToolSelected(ToolKind::Translate));
        assert_eq!(logs.entries()[1].message(), "Selected tool: translate");
    }

    #[test]
    fn test_success_logs_once_and_stores_result() {
        let (mut panel, service) = panel();
        let mut logs = LogList::new();
        panel.select_kind(ToolKind::Summarize, &mut logs);
        panel.input_text = "a long article".to_string();
        panel.process(&mut logs);
        assert!(panel.is_processing());
        assert_eq!(panel.phase(), AiToolsPhase::Processing(ToolKind::Summarize));

        settle(&mut panel, &mut logs);

        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(panel.phase(), AiToolsPhase::Settled(ToolKind::Summarize));
        assert_eq!(panel.result().and_then(|r| r.text()), Some("short"));
        let last = logs.entries().last().unwrap();
        assert_eq!(last.kind(), LogKind::Success);
        assert_eq!(last.message(), "Processing complete!");
    }

    #[test]
    fn test_failure_is_logged_and_shown_with_uniform_message() {
        let (mut panel, _) = panel();
        let mut logs = LogList::new();
        panel.select_kind(ToolKind::TextToImage, &mut logs);
        panel.input_text = "a red fox".to_string();
        panel.process(&mut logs);
        settle(&mut panel, &mut logs);

        let result = panel.result().expect("result");
        assert_eq!(result.error_message(), Some("Image generation failed"));
        let errors: Vec<_> = logs
            .entries()
            .iter()
            .filter(|e| e.kind() == LogKind::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Error: Image generation failed");
    }

    #[test]
    fn test_second_process_while_busy_is_ignored() {
        let (mut panel, _) = panel();
        let mut logs = LogList::new();
        panel.select_kind(ToolKind::Translate, &mut logs);
        panel.input_text = "bonjour".to_string();
        panel.process(&mut logs);
        let before = logs.len();
        panel.process(&mut logs);
        assert_eq!(logs.len(), before, "a busy panel must not log or dispatch again");
        settle(&mut panel, &mut logs);
    }
}
