// Dasa Sandbox - ui/mod.rs
//
// UI layer: presentation only.
// Dependencies: app (state), core (read-only models), egui; rfd and
// platform::image_io for the OCR image picker.

pub mod panels;
pub mod textures;
pub mod theme;
