// Dasa Sandbox - lib.rs
//
// Library entry point, exposing all non-GUI-shell modules for integration
// testing with fake capture and AI backends.
//
// The eframe::App implementation lives in `gui.rs` on the binary side and is
// not part of the library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
