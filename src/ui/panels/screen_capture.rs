// Dasa Sandbox - ui/panels/screen_capture.rs
//
// Screen capture demo: a single Start/Stop button, a status pill and the
// live preview of the captured display.

use crate::app::screen_capture::{CaptureState, ScreenCapturePanel};
use crate::core::log::LogSink;
use crate::ui::textures::{self, TextureCache};
use crate::ui::theme;

/// Render the screen capture panel.
pub fn render(
    ui: &mut egui::Ui,
    panel: &mut ScreenCapturePanel,
    log: &mut dyn LogSink,
    textures: &mut TextureCache,
) {
    ui.heading("Screen Capture");
    ui.label(
        egui::RichText::new("Share your screen and preview it live inside the sandbox.").weak(),
    );
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let state = panel.state();
        let label = match state {
            CaptureState::Idle => "Start Screen Share",
            CaptureState::Acquiring => "Waiting for screen access...",
            CaptureState::Sharing => "Stop Screen Share",
        };
        if ui
            .add_enabled(
                state != CaptureState::Acquiring,
                egui::Button::new(egui::RichText::new(label).strong()),
            )
            .clicked()
        {
            panel.toggle(log);
        }

        let (pill, colour) = match state {
            CaptureState::Idle => ("\u{25cf} Idle", theme::IDLE),
            CaptureState::Acquiring => ("\u{25cf} Starting", theme::WARNING),
            CaptureState::Sharing => ("\u{25cf} Sharing", theme::SHARING),
        };
        if state == CaptureState::Acquiring {
            ui.spinner();
        }
        ui.label(egui::RichText::new(pill).strong().color(colour));

        if let Some(source) = panel.source_label() {
            ui.separator();
            ui.label(egui::RichText::new(source).weak());
        }
    });

    if panel.source_ended() {
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(
                "The captured source has ended. Stop the share to release it.",
            )
            .color(theme::WARNING),
        );
    }

    ui.add_space(8.0);
    ui.separator();

    match panel.preview_frame() {
        Some(frame) => {
            let texture = textures.texture(ui.ctx(), textures::SLOT_CAPTURE_PREVIEW, &frame);
            let size = textures::fit_within(texture.size_vec2(), ui.available_size());
            ui.centered_and_justified(|ui| {
                ui.add(egui::Image::new(egui::load::SizedTexture::new(texture.id(), size)));
            });
        }
        None => {
            textures.release(textures::SLOT_CAPTURE_PREVIEW);
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Click \u{201c}Start Screen Share\u{201d} to begin")
                        .weak(),
                );
            });
        }
    }
}
