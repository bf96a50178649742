use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::Surface;

/// GPU copy of the drawing surface.
///
/// Re-uploads only when the surface revision changed since the last upload.
#[derive(Default)]
pub struct CanvasTexture {
    handle: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
    uploads: u64,
}

// Custom Debug implementation since TextureHandle carries the whole texture manager
impl std::fmt::Debug for CanvasTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasTexture")
            .field("texture_id", &self.handle.as_ref().map(TextureHandle::id))
            .field("uploaded_revision", &self.uploaded_revision)
            .field("uploads", &self.uploads)
            .finish()
    }
}

impl CanvasTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure the texture matches the surface and return its id
    pub fn sync(&mut self, ctx: &Context, surface: &Surface) -> TextureId {
        let revision = surface.revision();

        if let Some(handle) = &mut self.handle {
            if self.uploaded_revision != Some(revision) {
                handle.set(Self::color_image(surface), TextureOptions::NEAREST);
                self.uploaded_revision = Some(revision);
                self.uploads += 1;
            }
            return handle.id();
        }

        let handle = ctx.load_texture("drawing_surface", Self::color_image(surface), TextureOptions::NEAREST);
        let id = handle.id();
        self.handle = Some(handle);
        self.uploaded_revision = Some(revision);
        self.uploads += 1;
        id
    }

    /// How many times pixels were sent to the GPU
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    fn color_image(surface: &Surface) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [surface.width() as usize, surface.height() as usize],
            surface.as_raw(),
        )
    }
}
