//! A lit, spinning cube with orbit controls

use cgmath::Vector3;

use crate::config::DemoConfig;
use crate::error::Result;
use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
use crate::gfx::color::Color;
use crate::gfx::geometry::generate_cube;
use crate::gfx::resources::PhysicalMaterial;
use crate::gfx::scene::{Light, Object, Scene};
use crate::runtime::AnimationRules;
use crate::viewport::ResizeTarget;

use super::{Demo, DemoSetup};

pub const CUBE: &str = "cube";

#[derive(Debug, Clone, Default)]
pub struct BasicDemo;

impl BasicDemo {
    pub fn new() -> Self {
        Self
    }
}

impl Demo for BasicDemo {
    fn title(&self) -> &str {
        "vitrine: basic"
    }

    fn build(&self, _config: &DemoConfig, aspect: f32) -> Result<DemoSetup> {
        let camera = OrbitCamera::looking_at_origin(5.0, aspect);
        let mut scene = Scene::new(CameraManager::new(camera, CameraController::default()));

        scene.add_light(Light::ambient("ambient", Color::from_hex(0x404040), 1.0));
        scene.add_light(Light::point(
            "point",
            Color::WHITE,
            1.0,
            Vector3::new(2.0, 2.0, 4.0),
        ));

        scene.material_manager.add_physical(
            PhysicalMaterial::new(CUBE)
                .with_color(Color::from_hex(0x00ff00))
                .with_roughness(0.5)
                .with_metalness(0.2),
        );
        let cube = scene.add_object(Object::from_geometry(CUBE, &generate_cube(), CUBE));

        let rules = AnimationRules::new().with_spin(cube, Vector3::new(0.6, 0.6, 0.0));
        Ok(DemoSetup::new(scene, rules, ResizeTarget::CameraAspect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_scene() {
        let setup = BasicDemo::new().build(&DemoConfig::default(), 1.5).unwrap();
        let stats = setup.scene.statistics();
        assert_eq!(stats.object_count, 1);
        assert_eq!(stats.light_count, 2);
        assert_eq!(stats.total_triangles, 12);
        assert!(setup.panel.is_empty());
        assert!(setup.scene.lights().all(|light| light.shadow().is_none()));
    }
}
