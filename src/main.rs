// Dasa Sandbox - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and validation
// 3. Logging initialisation (debug mode support)
// 4. Capability wiring (HTTP AI service, native screen capture)
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::ui::...` etc.
pub use dasa_sandbox::app;
pub use dasa_sandbox::core;
pub use dasa_sandbox::platform;
pub use dasa_sandbox::ui;
pub use dasa_sandbox::util;

use crate::app::state::{AppState, PanelServices};
use crate::core::capture::CaptureBackend;
use crate::core::log::LogKind;
use crate::core::registry::Registry;
use crate::platform::ai_http::HttpAiService;
use crate::platform::capture::XcapBackend;
use crate::platform::config::AppConfig;
use crate::util::error::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Dasa Sandbox - a desktop sandbox of proof-of-concept demos.
///
/// Hosts a screen capture demo and a set of remote AI tools behind one tab
/// bar, with a shared session log on the side.
#[derive(Parser, Debug)]
#[command(name = "DasaSandbox", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Read configuration from this file instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

/// Wire the real capabilities (HTTP AI service, native screen capture)
/// from the loaded config.
fn build_services(config: &AppConfig) -> Result<PanelServices> {
    let ai = HttpAiService::new(config.endpoints.clone())?;
    let frame_interval = config.frame_interval;
    Ok(PanelServices {
        ai: Arc::new(ai),
        capture: Box::new(move || {
            Box::new(XcapBackend::new(frame_interval)) as Box<dyn CaptureBackend>
        }),
        languages: config.languages.clone(),
    })
}

fn main() {
    let cli = Cli::parse();

    // Config is loaded before logging so [logging] level can take effect.
    // Warnings are replayed once the subscriber is up.
    let platform_paths = crate::platform::config::PlatformPaths::resolve();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file());
    let (config, config_warnings) = crate::platform::config::load_config_file(&config_path);

    crate::util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = crate::util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "Dasa Sandbox starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }
    if let Some(ref file) = config.log_file {
        tracing::debug!(file = %file, "[logging] file is set but file output is not supported; logging to stderr");
    }

    let services = match build_services(&config) {
        Ok(services) => services,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up demo services");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut state = AppState::new(Registry::builtin(), services, cli.debug);
    for warning in config_warnings {
        state.append_log(format!("Config: {warning}"), LogKind::Info);
    }

    let settings = gui::UiSettings {
        dark_mode: config.dark_mode,
        font_size: config.font_size,
        log_panel_width: config.log_panel_width,
        frame_interval: config.frame_interval,
    };

    tracing::info!(demos = state.registry().len(), "Ready to launch GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                crate::util::constants::APP_NAME,
                crate::util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        crate::util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(gui::SandboxApp::new(cc, state, settings)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch Dasa Sandbox GUI: {e}");
        std::process::exit(1);
    }
}
