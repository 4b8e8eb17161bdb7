//! Window resize handling
//!
//! A resize recomputes the drawable size from the window's physical size and
//! pixel ratio, then pushes it to the render surface and to whatever in the
//! scene depends on it: the camera aspect ratio or a shader's `u_resolution`.

use crate::error::Result;
use crate::gfx::rendering::RenderSurface;
use crate::gfx::resources::MaterialId;
use crate::gfx::scene::Scene;

/// How many physical pixels per logical pixel the drawable may use
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelRatio {
    /// Device pixel ratio, but never above the cap
    Capped(f64),
    Full,
}

/// Drawable size in pixels, or `None` when the window has no area
///
/// `physical` is the window size reported by the host and `scale_factor` its
/// device pixel ratio.
pub fn drawable_size(
    physical: (u32, u32),
    scale_factor: f64,
    ratio: PixelRatio,
) -> Option<(u32, u32)> {
    let (width, height) = physical;
    if width == 0 || height == 0 {
        return None;
    }
    let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    let used = match ratio {
        PixelRatio::Capped(cap) if scale_factor > cap => cap,
        _ => return Some(physical),
    };
    let shrink = |v: u32| ((v as f64 / scale_factor * used).round() as u32).max(1);
    Some((shrink(width), shrink(height)))
}

/// Scene state that follows the drawable size
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeTarget {
    CameraAspect,
    ShaderResolution(MaterialId),
}

pub struct ResizeHandler {
    ratio: PixelRatio,
    target: ResizeTarget,
    current: Option<(u32, u32)>,
}

impl ResizeHandler {
    pub fn new(ratio: PixelRatio, target: ResizeTarget) -> Self {
        Self {
            ratio,
            target,
            current: None,
        }
    }

    /// Last drawable size applied
    pub fn current(&self) -> Option<(u32, u32)> {
        self.current
    }

    /// Applies a new window size. Returns the drawable size, or `None` for a
    /// zero-sized (minimised) window, which leaves everything untouched.
    pub fn handle(
        &mut self,
        physical: (u32, u32),
        scale_factor: f64,
        scene: &mut Scene,
        surface: &mut impl RenderSurface,
    ) -> Result<Option<(u32, u32)>> {
        let Some((width, height)) = drawable_size(physical, scale_factor, self.ratio) else {
            return Ok(None);
        };

        surface.resize(width, height);
        match &self.target {
            ResizeTarget::CameraAspect => scene.set_aspect(width, height),
            ResizeTarget::ShaderResolution(material) => {
                scene.material_manager.shader_mut(material)?.uniforms.resolution =
                    [width as f32, height as f32];
            }
        }

        if self.current != Some((width, height)) {
            log::debug!("drawable size {}x{}", width, height);
        }
        self.current = Some((width, height));
        Ok(Some((width, height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
    use crate::gfx::resources::ShaderMaterial;
    use crate::gfx::scene::SceneCamera;
    use image::RgbaImage;

    #[derive(Default)]
    struct FakeSurface {
        size: (u32, u32),
        resizes: usize,
    }

    impl RenderSurface for FakeSurface {
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.resizes += 1;
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn capture(&mut self, _scene: &mut Scene) -> Result<RgbaImage> {
            Ok(RgbaImage::new(self.size.0, self.size.1))
        }
    }

    fn orbit_scene() -> Scene {
        Scene::new(CameraManager::new(
            OrbitCamera::looking_at_origin(5.0, 1.0),
            CameraController::default(),
        ))
    }

    fn aspect(scene: &Scene) -> f32 {
        match &scene.camera {
            SceneCamera::Orbit(manager) => manager.camera.aspect,
            SceneCamera::Screen => panic!("expected an orbit camera"),
        }
    }

    #[test]
    fn test_pixel_ratio_cap() {
        assert_eq!(
            drawable_size((3000, 1500), 3.0, PixelRatio::Capped(2.0)),
            Some((2000, 1000))
        );
        assert_eq!(
            drawable_size((2400, 1600), 2.0, PixelRatio::Capped(2.0)),
            Some((2400, 1600))
        );
        assert_eq!(
            drawable_size((3000, 1500), 3.0, PixelRatio::Full),
            Some((3000, 1500))
        );
        assert_eq!(drawable_size((0, 600), 1.0, PixelRatio::Full), None);
    }

    #[test]
    fn test_resize_updates_camera_and_surface() {
        let mut scene = orbit_scene();
        let mut surface = FakeSurface::default();
        let mut handler = ResizeHandler::new(PixelRatio::Capped(2.0), ResizeTarget::CameraAspect);

        handler
            .handle((1600, 800), 1.0, &mut scene, &mut surface)
            .unwrap();
        assert_eq!(surface.size, (1600, 800));
        assert!((aspect(&scene) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut scene = orbit_scene();
        let mut surface = FakeSurface::default();
        let mut handler = ResizeHandler::new(PixelRatio::Capped(2.0), ResizeTarget::CameraAspect);

        handler
            .handle((1200, 800), 1.0, &mut scene, &mut surface)
            .unwrap();
        let first = (surface.size, aspect(&scene), handler.current());
        handler
            .handle((1200, 800), 1.0, &mut scene, &mut surface)
            .unwrap();
        assert_eq!(first, (surface.size, aspect(&scene), handler.current()));
    }

    #[test]
    fn test_resize_feeds_shader_resolution() {
        let mut scene = Scene::new_screen();
        let plane = scene
            .material_manager
            .add_shader(ShaderMaterial::builtin("plane"));
        let mut surface = FakeSurface::default();
        let mut handler =
            ResizeHandler::new(PixelRatio::Full, ResizeTarget::ShaderResolution(plane.clone()));

        handler
            .handle((2400, 1600), 2.0, &mut scene, &mut surface)
            .unwrap();
        let uniforms = scene.material_manager.shader(&plane).unwrap().uniforms;
        assert_eq!(uniforms.resolution, [2400.0, 1600.0]);
    }

    #[test]
    fn test_minimised_window_is_ignored() {
        let mut scene = orbit_scene();
        let mut surface = FakeSurface::default();
        let mut handler = ResizeHandler::new(PixelRatio::Capped(2.0), ResizeTarget::CameraAspect);

        handler
            .handle((800, 600), 1.0, &mut scene, &mut surface)
            .unwrap();
        assert_eq!(
            handler.handle((0, 0), 1.0, &mut scene, &mut surface).unwrap(),
            None
        );
        assert_eq!(surface.resizes, 1);
        assert_eq!(handler.current(), Some((800, 600)));
    }
}
