// Dasa Sandbox - ui/textures.rs
//
// GPU texture cache for decoded images. One named slot per place an image is
// shown; a slot is re-uploaded only when the buffer's serial changes, so a
// capture preview costs one upload per new frame, not one per repaint.

use crate::core::model::PixelBuffer;
use std::collections::HashMap;

/// Texture slots used by the panels.
pub const SLOT_CAPTURE_PREVIEW: &str = "capture-preview";
pub const SLOT_OCR_INPUT: &str = "ocr-input";
pub const SLOT_GENERATED: &str = "generated-image";

#[derive(Default)]
pub struct TextureCache {
    slots: HashMap<&'static str, (u64, egui::TextureHandle)>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `buffer` in `slot`, uploading only if the slot holds a
    /// different buffer.
    pub fn texture(
        &mut self,
        ctx: &egui::Context,
        slot: &'static str,
        buffer: &PixelBuffer,
    ) -> egui::TextureHandle {
        let image = || egui::ColorImage::from_rgba_unmultiplied(buffer.size(), &buffer.rgba);

        match self.slots.get_mut(slot) {
            Some((serial, handle)) if *serial == buffer.serial => handle.clone(),
            Some((serial, handle)) => {
                handle.set(image(), egui::TextureOptions::LINEAR);
                *serial = buffer.serial;
                handle.clone()
            }
            None => {
                let handle = ctx.load_texture(slot, image(), egui::TextureOptions::LINEAR);
                self.slots.insert(slot, (buffer.serial, handle.clone()));
                handle
            }
        }
    }

    /// Drop the texture in `slot`, freeing GPU memory.
    pub fn release(&mut self, slot: &'static str) {
        self.slots.remove(slot);
    }
}

/// Scale `size` down to fit within `max`, preserving aspect ratio.
pub fn fit_within(size: egui::Vec2, max: egui::Vec2) -> egui::Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let scale = (max.x / size.x).min(max.y / size.y).min(1.0);
    size * scale
}
