// Dasa Sandbox - gui.rs
//
// Top-level eframe::App implementation.
// Drives the mounted panel's background work and lays out the window:
// menu bar, status bar, demo tabs, the log panel on the right and the active
// demo in the centre.

use crate::app::state::{ActivePanel, AppState};
use crate::ui;
use crate::ui::textures::TextureCache;
use crate::util::constants;
use std::time::Duration;

/// UI settings taken from config at startup.
#[derive(Debug, Clone, Copy)]
pub struct UiSettings {
    pub dark_mode: bool,
    pub font_size: f32,
    pub log_panel_width: f32,
    pub frame_interval: Duration,
}

/// The sandbox application.
pub struct SandboxApp {
    pub state: AppState,
    settings: UiSettings,
    textures: TextureCache,
}

impl SandboxApp {
    /// Create the application and apply the configured look.
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState, settings: UiSettings) -> Self {
        apply_style(&cc.egui_ctx, &settings);
        Self {
            state,
            settings,
            textures: TextureCache::new(),
        }
    }
}

fn apply_style(ctx: &egui::Context, settings: &UiSettings) {
    ctx.set_visuals(if settings.dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    let size = settings.font_size;
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            font_id.size = match text_style {
                egui::TextStyle::Heading => size * 1.4,
                egui::TextStyle::Small => size * 0.8,
                egui::TextStyle::Monospace => size * 0.95,
                _ => size,
            };
        }
    });
}

impl eframe::App for SandboxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Deliver settled jobs and notice ended capture sources before drawing.
        let busy = self.state.poll_active();
        if busy {
            let interval = match self.state.panel() {
                Some(ActivePanel::ScreenCapture(_)) => self.settings.frame_interval,
                _ => Duration::from_millis(constants::JOB_POLL_INTERVAL_MS),
            };
            ctx.request_repaint_after(interval);
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    let has_logs = !self.state.logs().is_empty();
                    ui.add_enabled_ui(has_logs, |ui| {
                        let n = self.state.logs().len();
                        if ui.button(format!("Copy Logs ({n} entries)")).clicked() {
                            ctx.copy_text(self.state.logs().report());
                            self.state.status_message =
                                format!("Copied {n} log entries to clipboard.");
                            ui.close_menu();
                        }
                        if ui.button("Clear Logs").clicked() {
                            self.state.clear_logs();
                            self.state.status_message = "Logs cleared.".to_string();
                            ui.close_menu();
                        }
                    });
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(ActivePanel::ScreenCapture(p)) = self.state.panel() {
                    if p.is_sharing() {
                        ui.label(
                            egui::RichText::new(" \u{25cf} SHARING ")
                                .strong()
                                .color(ui::theme::SHARING)
                                .background_color(egui::Color32::from_rgba_premultiplied(
                                    34, 197, 94, 30,
                                )),
                        );
                        ui.separator();
                    }
                }
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.state.debug_mode {
                        ui.label(egui::RichText::new("DEBUG").small().weak());
                    }
                    if let Some(descriptor) = self.state.active_descriptor() {
                        ui.label(descriptor.title);
                    }
                });
            });
        });

        // Demo tabs
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui::panels::tabs::render(ui, &mut self.state);
        });

        // Log panel (right)
        let dark_mode = self.settings.dark_mode;
        egui::SidePanel::right("log_panel")
            .default_width(self.settings.log_panel_width)
            .resizable(true)
            .show(ctx, |ui| {
                ui::panels::log_viewer::render(ui, &mut self.state, dark_mode);
            });

        // Central panel (active demo)
        egui::CentralPanel::default().show(ctx, |ui| {
            let textures = &mut self.textures;
            match self.state.panel_mut() {
                Some((ActivePanel::AiTools(panel), logs)) => {
                    ui::panels::ai_tools::render(ui, panel, logs, textures, dark_mode);
                }
                Some((ActivePanel::ScreenCapture(panel), logs)) => {
                    ui::panels::screen_capture::render(ui, panel, logs, textures);
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label("No demos registered.");
                    });
                }
            }
        });

        ui::panels::about::render(ctx, &mut self.state);
    }

    /// Called by eframe when the window is about to close. Unmounting the
    /// panel stops any running capture before the process exits.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.release_panel();
        tracing::info!(log_entries = self.state.logs().len(), "Sandbox closing");
    }
}
