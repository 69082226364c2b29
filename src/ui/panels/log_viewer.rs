// Dasa Sandbox - ui/panels/log_viewer.rs
//
// Session log panel: newest entry first, colour-coded by kind, with Clear
// and Copy actions. Read-only view over the host's log list.

use crate::app::state::AppState;
use crate::core::log::LogEntry;
use crate::ui::theme;
use egui::text::{LayoutJob, TextFormat};

/// Render the log panel.
pub fn render(ui: &mut egui::Ui, state: &mut AppState, dark_mode: bool) {
    let count = state.logs().len();

    ui.horizontal(|ui| {
        ui.heading("Logs");
        ui.label(
            egui::RichText::new(format!(" {count} "))
                .small()
                .strong()
                .background_color(ui.visuals().faint_bg_color),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(count > 0, egui::Button::new("Clear"))
                .clicked()
            {
                state.clear_logs();
                state.status_message = "Logs cleared.".to_string();
            }
            if ui
                .add_enabled(count > 0, egui::Button::new("Copy"))
                .on_hover_text("Copy all log entries to the clipboard")
                .clicked()
            {
                ui.ctx().copy_text(state.logs().report());
                state.status_message = format!("Copied {count} log entries to clipboard.");
            }
        });
    });
    ui.separator();

    if state.logs().is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("No logs yet...").weak());
        });
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("log_viewer")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for entry in state.logs().newest_first() {
                render_entry(ui, entry, dark_mode);
            }
        });
}

fn render_entry(ui: &mut egui::Ui, entry: &LogEntry, dark_mode: bool) {
    let kind = entry.kind();
    let mut job = entry_layout(
        entry,
        dark_mode,
        egui::TextStyle::Monospace.resolve(ui.style()),
        egui::TextStyle::Body.resolve(ui.style()),
        ui.visuals().weak_text_color(),
    );
    job.wrap.max_width = ui.available_width();

    egui::Frame::group(ui.style())
        .fill(theme::log_kind_bg_colour(kind))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(job).on_hover_text(kind.label());
        });
}

/// One log row: kind dot, time of day, kind tag and message. Everything but
/// the time is drawn in the kind's colour.
fn entry_layout(
    entry: &LogEntry,
    dark_mode: bool,
    mono: egui::FontId,
    body: egui::FontId,
    weak: egui::Color32,
) -> LayoutJob {
    let kind = entry.kind();
    let colour = theme::log_kind_colour(kind, dark_mode);

    let mut job = LayoutJob::default();
    job.append(
        "\u{25cf}",
        0.0,
        TextFormat {
            font_id: body.clone(),
            color: colour,
            ..Default::default()
        },
    );
    job.append(
        &entry.time_of_day(),
        6.0,
        TextFormat {
            font_id: mono.clone(),
            color: weak,
            ..Default::default()
        },
    );
    job.append(
        &format!("[{}]", kind.short_label()),
        6.0,
        TextFormat {
            font_id: mono,
            color: colour,
            ..Default::default()
        },
    );
    job.append(
        entry.message(),
        6.0,
        TextFormat {
            font_id: body,
            color: colour,
            ..Default::default()
        },
    );
    job
}
