//! The demo variants
//!
//! Every variant is a [`Demo`]: static settings plus a function that builds
//! its scene, control panel and animation rules. [`DemoSession`](crate::session::DemoSession)
//! runs any of them the same way.

pub mod basic;
pub mod physical;
pub mod shader;

pub use basic::BasicDemo;
pub use physical::PhysicalDemo;
pub use shader::ShaderDemo;

use crate::config::DemoConfig;
use crate::controls::ControlPanel;
use crate::error::Result;
use crate::gfx::resources::MaterialId;
use crate::gfx::scene::Scene;
use crate::runtime::AnimationRules;
use crate::viewport::{PixelRatio, ResizeTarget};

/// Everything a demo builds once at startup
pub struct DemoSetup {
    pub scene: Scene,
    pub panel: ControlPanel,
    pub rules: AnimationRules,
    pub resize_target: ResizeTarget,
    /// Shader materials whose `u_mouse` follows the cursor
    pub pointer_targets: Vec<MaterialId>,
}

impl DemoSetup {
    pub fn new(scene: Scene, rules: AnimationRules, resize_target: ResizeTarget) -> Self {
        Self {
            scene,
            panel: ControlPanel::new("Controls"),
            rules,
            resize_target,
            pointer_targets: Vec::new(),
        }
    }

    /// Attaches `panel` once its bindings check out against the scene
    pub fn with_panel(mut self, panel: ControlPanel) -> Result<Self> {
        panel.validate(&self.scene)?;
        self.panel = panel;
        Ok(self)
    }

    pub fn with_pointer_target(mut self, material: impl Into<MaterialId>) -> Self {
        self.pointer_targets.push(material.into());
        self
    }
}

pub trait Demo {
    fn title(&self) -> &str;

    fn pixel_ratio(&self) -> PixelRatio {
        PixelRatio::Capped(2.0)
    }

    /// Encode output as sRGB; raw shader output is shown as written when false
    fn srgb_output(&self) -> bool {
        true
    }

    /// Builds the scene for a window of `aspect` width over height
    fn build(&self, config: &DemoConfig, aspect: f32) -> Result<DemoSetup>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{LightField, MaterialField, Property};
    use crate::error::VitrineError;
    use crate::gfx::color::Color;
    use crate::gfx::scene::Light;

    #[test]
    fn test_panel_with_unknown_material_is_rejected() {
        let mut scene = Scene::new_screen();
        let ambient = scene.add_light(Light::ambient("ambient", Color::WHITE, 1.0));

        let mut panel = ControlPanel::new("Controls");
        panel
            .add_slider("Lighting/Ambient", "intensity", 0.1, 10.0, 1.0)
            .bind(Property::light(ambient, LightField::Intensity));
        panel
            .add_slider("Cube/Material", "roughness", 0.0, 1.0, 0.5)
            .bind(Property::material("missing", MaterialField::Roughness));

        let result = DemoSetup::new(scene, AnimationRules::new(), ResizeTarget::CameraAspect)
            .with_panel(panel);
        assert!(matches!(result, Err(VitrineError::UnknownMaterial(_))));
    }
}
