// Dasa Sandbox - ui/panels/mod.rs

pub mod about;
pub mod ai_tools;
pub mod log_viewer;
pub mod screen_capture;
pub mod tabs;
