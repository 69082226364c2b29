// Dasa Sandbox - platform/mod.rs
//
// Platform layer: config files, native screen capture, HTTP AI services,
// image decoding. Implements the capability traits defined in core.
// Dependencies: core, util.
// Must NOT depend on: app, ui.

pub mod ai_http;
pub mod capture;
pub mod config;
pub mod image_io;
