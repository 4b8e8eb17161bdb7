use image::RgbaImage;

use crate::error::Result;
use crate::gfx::scene::Scene;

/// Something the scene can be drawn into and read back from
///
/// Implemented by [`RenderEngine`](super::RenderEngine). Resize and snapshot
/// handling only go through this trait, so tests can use a fake surface.
pub trait RenderSurface {
    /// Resizes the drawable area in physical pixels
    fn resize(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);

    /// Renders one frame synchronously and returns its pixels
    fn capture(&mut self, scene: &mut Scene) -> Result<RgbaImage>;
}
