// Dasa Sandbox - ui/panels/tabs.rs
//
// Demo tab strip. One tab per registered demo, in registry order; the active
// tab is highlighted.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the tab strip.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let mut clicked: Option<&'static str> = None;

    ui.horizontal(|ui| {
        for descriptor in state.registry().descriptors() {
            let active = state.active_id() == Some(descriptor.id);
            let text = if active {
                egui::RichText::new(descriptor.title)
                    .strong()
                    .color(theme::ACCENT)
            } else {
                egui::RichText::new(descriptor.title)
            };
            let tab = egui::Button::new(text)
                .selected(active)
                .min_size(egui::vec2(0.0, theme::TAB_HEIGHT));
            if ui.add(tab).clicked() {
                clicked = Some(descriptor.id);
            }
        }
    });

    if let Some(id) = clicked {
        state.select_tool(id);
    }
}
