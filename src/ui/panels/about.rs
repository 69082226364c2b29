// Dasa Sandbox - ui/panels/about.rs
//
// About dialog, opened from Help > About. Centred, non-resizable window.

use crate::app::state::AppState;
use crate::util::constants;

/// Render the About dialog (if `state.show_about` is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_about {
        return;
    }

    let mut open = true;
    egui::Window::new(format!("About {}", constants::APP_NAME))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .min_width(340.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(8.0);

            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(constants::APP_NAME).size(26.0).strong());
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(format!("v{}", constants::APP_VERSION))
                        .size(14.0)
                        .weak(),
                );
            });

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(8.0);

            ui.vertical_centered(|ui| {
                ui.label("Proof-of-concept demos in one window:");
                ui.label("screen capture and remote AI tools.");
            });

            ui.add_space(10.0);

            ui.vertical_centered(|ui| {
                for descriptor in state.registry().descriptors() {
                    ui.label(egui::RichText::new(descriptor.title).small());
                }
            });

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(6.0);

            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("Built with Rust & egui").small().weak());
                if state.debug_mode {
                    ui.label(egui::RichText::new("Debug logging enabled").small().weak());
                }
            });

            ui.add_space(8.0);
        });

    if !open {
        state.show_about = false;
    }
}
