// Dasa Sandbox - core/registry.rs
//
// Static registry of demos shown as tabs. Defined once at startup and never
// mutated. Ids are unique; the first descriptor is the default selection.

use crate::util::constants;

/// Which panel implementation a demo mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    AiTools,
    ScreenCapture,
}

/// One demo tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub panel: PanelKind,
}

/// Ordered set of demos with unique ids.
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: Vec<ToolDescriptor>,
}

impl Registry {
    /// Build a registry. A descriptor whose id is already taken is dropped
    /// with a warning; the earlier one wins.
    pub fn new(descriptors: Vec<ToolDescriptor>) -> Self {
        let mut unique: Vec<ToolDescriptor> = Vec::with_capacity(descriptors.len());
        for d in descriptors {
            if unique.iter().any(|u| u.id == d.id) {
                tracing::warn!(id = d.id, "Duplicate demo id in registry; ignoring later entry");
                continue;
            }
            unique.push(d);
        }
        Self {
            descriptors: unique,
        }
    }

    /// The demos shipped with the sandbox.
    pub fn builtin() -> Self {
        Self::new(vec![
            ToolDescriptor {
                id: constants::DEMO_AI_TOOLS,
                title: "AI Tools",
                panel: PanelKind::AiTools,
            },
            ToolDescriptor {
                id: constants::DEMO_SCREEN_CAPTURE,
                title: "Screen Capture",
                panel: PanelKind::ScreenCapture,
            },
        ])
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    /// Default selection: the first registered demo.
    pub fn first(&self) -> Option<&ToolDescriptor> {
        self.descriptors.first()
    }

    pub fn find(&self, id: &str) -> Option<&ToolDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_default() {
        let reg = Registry::builtin();
        let ids: Vec<&str> = reg.descriptors().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["ai-tools", "screen-capture"]);
        assert_eq!(reg.first().map(|d| d.panel), Some(PanelKind::AiTools));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let reg = Registry::new(vec![
            ToolDescriptor {
                id: "x",
                title: "First",
                panel: PanelKind::AiTools,
            },
            ToolDescriptor {
                id: "x",
                title: "Second",
                panel: PanelKind::ScreenCapture,
            },
        ]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.find("x").map(|d| d.title), Some("First"));
    }

    #[test]
    fn test_unknown_id_is_absent() {
        let reg = Registry::builtin();
        assert!(!reg.contains("video-call"));
        assert!(reg.find("").is_none());
    }
}
