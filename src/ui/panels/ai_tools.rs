// Dasa Sandbox - ui/panels/ai_tools.rs
//
// AI tools demo: four tool cards, the input for the selected tool, the
// Process button and the result card.
//
// The Process button is disabled while a request is outstanding, so at most
// one request per panel is ever in flight.

use crate::app::ai_tools::AiToolsPanel;
use crate::core::log::LogSink;
use crate::core::tools::{OriginalInput, ToolKind, ToolOutcome, ToolOutput, ToolResult};
use crate::platform::image_io;
use crate::ui::textures::{self, TextureCache};
use crate::ui::theme;
use crate::util::constants;

/// Render the AI tools panel.
pub fn render(
    ui: &mut egui::Ui,
    panel: &mut AiToolsPanel,
    log: &mut dyn LogSink,
    textures: &mut TextureCache,
    dark_mode: bool,
) {
    ui.heading("AI Tools");
    ui.label(egui::RichText::new("Pick a tool, give it some input and run it.").weak());
    ui.add_space(8.0);

    egui::ScrollArea::vertical()
        .id_salt("ai_tools")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            render_cards(ui, panel, log, dark_mode);

            let Some(kind) = panel.selected() else {
                ui.add_space(16.0);
                ui.label(egui::RichText::new("Select a tool above to get started.").weak());
                return;
            };

            ui.add_space(12.0);
            ui.separator();
            render_input(ui, panel, kind, log, textures);

            ui.add_space(8.0);
            let busy = panel.is_processing();
            ui.horizontal(|ui| {
                let button = egui::Button::new(egui::RichText::new("Process").strong());
                if ui.add_enabled(!busy, button).clicked() {
                    panel.process(log);
                }
                if busy {
                    ui.spinner();
                    ui.label(kind.progress_text());
                }
            });

            if let Some(result) = panel.result() {
                ui.add_space(12.0);
                render_result(ui, result, textures, dark_mode);
            }
        });
}

fn render_cards(ui: &mut egui::Ui, panel: &mut AiToolsPanel, log: &mut dyn LogSink, dark_mode: bool) {
    let mut picked: Option<ToolKind> = None;

    ui.horizontal_wrapped(|ui| {
        for &kind in ToolKind::all() {
            let selected = panel.selected() == Some(kind);
            let mut frame = egui::Frame::group(ui.style());
            if selected {
                frame = frame
                    .fill(theme::ACCENT.gamma_multiply(if dark_mode { 0.25 } else { 0.12 }))
                    .stroke(egui::Stroke::new(1.5, theme::ACCENT));
            }
            let card = frame.show(ui, |ui| {
                ui.set_width(theme::TOOL_CARD_WIDTH);
                ui.set_min_height(theme::TOOL_CARD_HEIGHT);
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(kind.title()).strong());
                    ui.label(egui::RichText::new(kind.description()).small().weak());
                });
            });
            let response = ui
                .interact(card.response.rect, ui.id().with(kind.id()), egui::Sense::click())
                .on_hover_cursor(egui::CursorIcon::PointingHand);
            if response.clicked() && !selected {
                picked = Some(kind);
            }
        }
    });

    if let Some(kind) = picked {
        panel.select_kind(kind, log);
    }
}

fn render_input(
    ui: &mut egui::Ui,
    panel: &mut AiToolsPanel,
    kind: ToolKind,
    log: &mut dyn LogSink,
    textures: &mut TextureCache,
) {
    ui.strong(kind.title());
    ui.add_space(4.0);

    if kind.takes_image() {
        ui.horizontal(|ui| {
            if ui.button("Choose Image\u{2026}").clicked() {
                pick_image(panel, log);
            }
            match panel.input_image() {
                Some(image) => ui.label(&image.file_name),
                None => ui.label(egui::RichText::new("No image selected").weak()),
            };
        });

        match panel.input_image().map(|i| i.preview.as_ref()) {
            Some(Some(buffer)) => {
                let texture = textures.texture(ui.ctx(), textures::SLOT_OCR_INPUT, buffer);
                let max = egui::vec2(ui.available_width(), theme::THUMBNAIL_MAX_HEIGHT);
                let size = textures::fit_within(texture.size_vec2(), max);
                ui.add(egui::Image::new(egui::load::SizedTexture::new(texture.id(), size)));
            }
            Some(None) => {
                textures.release(textures::SLOT_OCR_INPUT);
                ui.label(egui::RichText::new("No preview for this file type.").weak());
            }
            None => textures.release(textures::SLOT_OCR_INPUT),
        }
        return;
    }

    let mut edit = egui::TextEdit::multiline(&mut panel.input_text)
        .desired_rows(theme::INPUT_ROWS)
        .desired_width(f32::INFINITY);
    if let Some(hint) = kind.placeholder() {
        edit = edit.hint_text(hint);
    }
    ui.add(edit);
}

fn pick_image(panel: &mut AiToolsPanel, log: &mut dyn LogSink) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Images", constants::IMAGE_FILE_EXTENSIONS)
        .pick_file()
    else {
        return;
    };

    match image_io::load_image_file(&path) {
        Ok(image) => panel.attach_image(image, log),
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Image could not be loaded");
            log.error(format!("Could not load image: {e}"));
        }
    }
}

fn render_result(
    ui: &mut egui::Ui,
    result: &ToolResult,
    textures: &mut TextureCache,
    dark_mode: bool,
) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.strong(result.kind.result_title());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(result.timestamp.format("%H:%M:%S").to_string())
                        .small()
                        .weak(),
                );
            });
        });

        match &result.original_input {
            OriginalInput::Text(text) => {
                ui.label(
                    egui::RichText::new(format!("Input: {}", shorten(text, 160)))
                        .small()
                        .weak(),
                );
            }
            OriginalInput::Image(image) => {
                ui.label(
                    egui::RichText::new(format!("Input: {}", image.file_name))
                        .small()
                        .weak(),
                );
            }
        }
        ui.add_space(6.0);

        match &result.outcome {
            ToolOutcome::Error(message) => {
                ui.label(
                    egui::RichText::new(message)
                        .color(theme::log_kind_colour(crate::core::log::LogKind::Error, dark_mode)),
                );
            }
            ToolOutcome::Success(ToolOutput::Text(text)) => {
                let mut view = text.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut view)
                        .desired_width(f32::INFINITY)
                        .font(egui::TextStyle::Monospace),
                );
                if ui.small_button("Copy").clicked() {
                    ui.ctx().copy_text(text.clone());
                }
            }
            ToolOutcome::Success(ToolOutput::Image(image)) => match &image.preview {
                Some(buffer) => {
                    let texture = textures.texture(ui.ctx(), textures::SLOT_GENERATED, buffer);
                    let max = egui::vec2(ui.available_width(), theme::PREVIEW_MAX_HEIGHT);
                    let size = textures::fit_within(texture.size_vec2(), max);
                    ui.add(egui::Image::new(egui::load::SizedTexture::new(texture.id(), size)));
                }
                None => {
                    textures.release(textures::SLOT_GENERATED);
                    ui.label(
                        egui::RichText::new(format!(
                            "Image received ({} bytes), preview unavailable.",
                            image.bytes.len()
                        ))
                        .weak(),
                    );
                }
            },
        }
    });
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}\u{2026}")
    }
}
