// Dasa Sandbox - core/mod.rs
//
// Core business logic layer: the log model, demo registry, AI tool
// contract and capture capability traits.
// Dependencies: util, chrono, tracing.
// Must NOT depend on: ui, platform, app, or any I/O crate directly.

pub mod capture;
pub mod log;
pub mod model;
pub mod registry;
pub mod tools;
