// Dasa Sandbox - app/mod.rs
//
// Application layer: host state, panel state machines, background jobs.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod ai_tools;
pub mod jobs;
pub mod screen_capture;
pub mod state;
