// Dasa Sandbox - app/state.rs
//
// Demo host state: the static demo registry, the active selection, the
// mounted panel and the session log. Owned by the eframe::App implementation.
//
// The log list lives here and nowhere else. Panels get `&mut dyn LogSink`
// for the duration of a call and cannot read or rewrite history.

use crate::app::ai_tools::AiToolsPanel;
use crate::app::screen_capture::ScreenCapturePanel;
use crate::core::capture::CaptureBackend;
use crate::core::log::{LogKind, LogList};
use crate::core::registry::{PanelKind, Registry, ToolDescriptor};
use crate::core::tools::{AiService, TranslationLanguages};
use std::sync::Arc;

/// Builds a fresh capture backend for each mounted screen capture panel.
pub type CaptureFactory = Box<dyn Fn() -> Box<dyn CaptureBackend>>;

/// Capabilities handed to panels when they are mounted.
pub struct PanelServices {
    pub ai: Arc<dyn AiService>,
    pub capture: CaptureFactory,
    pub languages: TranslationLanguages,
}

/// The mounted panel. One variant per `PanelKind`.
pub enum ActivePanel {
    AiTools(AiToolsPanel),
    ScreenCapture(ScreenCapturePanel),
}

impl ActivePanel {
    /// Mount a fresh panel of `kind`. Nothing carries over from earlier panels.
    fn mount(kind: PanelKind, services: &PanelServices) -> Self {
        match kind {
            PanelKind::AiTools => ActivePanel::AiTools(AiToolsPanel::new(
                Arc::clone(&services.ai),
                services.languages.clone(),
            )),
            PanelKind::ScreenCapture => {
                ActivePanel::ScreenCapture(ScreenCapturePanel::new((services.capture)()))
            }
        }
    }

    /// Whether the panel has background work the UI should keep polling for.
    pub fn needs_polling(&self) -> bool {
        match self {
            ActivePanel::AiTools(p) => p.is_processing(),
            ActivePanel::ScreenCapture(p) => p.is_sharing() || p.is_acquiring(),
        }
    }
}

/// Top-level host state.
pub struct AppState {
    registry: Registry,
    services: PanelServices,
    active_id: Option<&'static str>,
    panel: Option<ActivePanel>,
    logs: LogList,

    /// Status message for the status bar.
    pub status_message: String,

    /// Whether to show the About dialog.
    pub show_about: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    /// Create host state with the first registered demo mounted.
    pub fn new(registry: Registry, services: PanelServices, debug_mode: bool) -> Self {
        let first = registry.first().copied();
        let mut state = Self {
            registry,
            services,
            active_id: None,
            panel: None,
            logs: LogList::new(),
            status_message: "Ready.".to_string(),
            show_about: false,
            debug_mode,
        };
        if let Some(descriptor) = first {
            state.mount(descriptor);
        } else {
            tracing::warn!("Demo registry is empty; nothing to show");
        }
        state
    }

    fn mount(&mut self, descriptor: ToolDescriptor) {
        // Drop the old panel first so a held capture is released before a
        // new panel could ask for one.
        self.panel = None;
        self.panel = Some(ActivePanel::mount(descriptor.panel, &self.services));
        self.active_id = Some(descriptor.id);
        self.status_message = format!("{} ready.", descriptor.title);
        tracing::info!(demo = descriptor.id, "Demo mounted");
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.active_id
    }

    /// Descriptor of the active demo, if the selection resolves.
    pub fn active_descriptor(&self) -> Option<&ToolDescriptor> {
        self.active_id.and_then(|id| self.registry.find(id))
    }

    /// Select the demo with `id`.
    ///
    /// Unknown ids leave the selection unchanged and return `false`.
    /// Re-selecting the active demo keeps its panel as it is.
    pub fn select_tool(&mut self, id: &str) -> bool {
        let Some(descriptor) = self.registry.find(id).copied() else {
            tracing::warn!(id, "Ignoring selection of unregistered demo");
            return false;
        };
        if self.active_id == Some(descriptor.id) {
            return true;
        }
        self.mount(descriptor);
        true
    }

    /// Append a host-level log line stamped now.
    pub fn append_log(&mut self, message: impl Into<String>, kind: LogKind) {
        self.logs.push(message, kind);
    }

    /// Empty the log. Idempotent.
    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    pub fn logs(&self) -> &LogList {
        &self.logs
    }

    /// The mounted panel together with the log capability for it.
    pub fn panel_mut(&mut self) -> Option<(&mut ActivePanel, &mut LogList)> {
        let logs = &mut self.logs;
        self.panel.as_mut().map(|p| (p, logs))
    }

    pub fn panel(&self) -> Option<&ActivePanel> {
        self.panel.as_ref()
    }

    /// Unmount the active panel, releasing whatever it holds. The selection
    /// stays so a later `select_tool` of another demo still works.
    pub fn release_panel(&mut self) {
        if self.panel.take().is_some() {
            tracing::debug!(demo = ?self.active_id, "Panel released");
        }
    }

    /// Drive background work of the mounted panel. Returns `true` when the
    /// panel still has outstanding work and the UI should keep repainting.
    pub fn poll_active(&mut self) -> bool {
        let Some((panel, logs)) = self.panel_mut() else {
            return false;
        };
        match panel {
            ActivePanel::AiTools(p) => {
                p.poll(logs);
            }
            ActivePanel::ScreenCapture(p) => p.poll(logs),
        }
        panel.needs_polling()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capture::{CaptureRequest, CaptureStream};
    use crate::core::model::{GeneratedImage, ImageInput};
    use crate::util::error::{CaptureError, ServiceError};

    struct NoAi;

    impl AiService for NoAi {
        fn extract_text(&self, _i: &ImageInput) -> Result<String, ServiceError> {
            Err(ServiceError::EmptyResult { operation: "ocr" })
        }
        fn generate_image(&self, _p: &str) -> Result<GeneratedImage, ServiceError> {
            Err(ServiceError::EmptyResult {
                operation: "text-to-image",
            })
        }
        fn summarize(&self, _t: &str) -> Result<String, ServiceError> {
            Err(ServiceError::EmptyResult {
                operation: "summarize",
            })
        }
        fn translate(&self, _t: &str, _s: &str, _g: &str) -> Result<String, ServiceError> {
            Err(ServiceError::EmptyResult {
                operation: "translate",
            })
        }
    }

    struct NoCapture;

    impl CaptureBackend for NoCapture {
        fn acquire(&mut self, _r: &CaptureRequest) -> Result<CaptureStream, CaptureError> {
            Err(CaptureError::NoSource)
        }
    }

    fn services() -> PanelServices {
        PanelServices {
            ai: Arc::new(NoAi),
            capture: Box::new(|| Box::new(NoCapture) as Box<dyn CaptureBackend>),
            languages: TranslationLanguages::default(),
        }
    }

    #[test]
    fn test_defaults_to_first_demo() {
        let state = AppState::new(Registry::builtin(), services(), false);
        assert_eq!(state.active_id(), Some("ai-tools"));
        assert!(matches!(state.panel(), Some(ActivePanel::AiTools(_))));
    }

    #[test]
    fn test_select_unknown_id_is_ignored() {
        let mut state = AppState::new(Registry::builtin(), services(), false);
        assert!(!state.select_tool("does-not-exist"));
        assert_eq!(state.active_id(), Some("ai-tools"));
    }

    #[test]
    fn test_select_mounts_fresh_panel() {
        let mut state = AppState::new(Registry::builtin(), services(), false);
        if let Some((ActivePanel::AiTools(p), logs)) = state.panel_mut() {
            p.select_kind(crate::core::tools::ToolKind::Summarize, logs);
            p.input_text = "draft".to_string();
        }
        assert!(state.select_tool("screen-capture"));
        assert!(state.select_tool("ai-tools"));
        match state.panel() {
            Some(ActivePanel::AiTools(p)) => {
                assert!(p.selected().is_none());
                assert!(p.input_text.is_empty());
            }
            _ => panic!("expected AI tools panel"),
        }
        assert_eq!(state.logs().len(), 1, "host switches do not log");
    }

    #[test]
    fn test_empty_registry_renders_nothing() {
        let state = AppState::new(Registry::new(Vec::new()), services(), false);
        assert!(state.active_id().is_none());
        assert!(state.panel().is_none());
        assert!(state.active_descriptor().is_none());
    }

    #[test]
    fn test_clear_logs_twice_equals_once() {
        let mut state = AppState::new(Registry::builtin(), services(), false);
        state.append_log("one", LogKind::Info);
        state.append_log("two", LogKind::Success);
        state.clear_logs();
        assert_eq!(state.logs().len(), 0);
        state.clear_logs();
        assert_eq!(state.logs().len(), 0);
    }
}
