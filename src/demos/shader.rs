//! Full-screen plane drawn by a shader material fed with time, resolution
//! and mouse uniforms

use crate::config::DemoConfig;
use crate::error::Result;
use crate::gfx::geometry::generate_plane;
use crate::gfx::resources::ShaderMaterial;
use crate::gfx::scene::{Object, Scene};
use crate::runtime::AnimationRules;
use crate::viewport::{PixelRatio, ResizeTarget};

use super::{Demo, DemoSetup};

pub const SCREEN: &str = "screen";

#[derive(Debug, Clone, Default)]
pub struct ShaderDemo;

impl ShaderDemo {
    pub fn new() -> Self {
        Self
    }
}

impl Demo for ShaderDemo {
    fn title(&self) -> &str {
        "vitrine: shader"
    }

    fn pixel_ratio(&self) -> PixelRatio {
        PixelRatio::Full
    }

    fn srgb_output(&self) -> bool {
        false
    }

    fn build(&self, config: &DemoConfig, _aspect: f32) -> Result<DemoSetup> {
        let material = match &config.shader_path {
            Some(path) => ShaderMaterial::from_file(SCREEN, path, config.load_policy)?,
            None => ShaderMaterial::builtin(SCREEN),
        };

        let mut scene = Scene::new_screen();
        let material = scene.material_manager.add_shader(material);
        // 2x2 plane spans clip space exactly
        scene.add_object(Object::from_geometry(
            SCREEN,
            &generate_plane(2.0, 2.0, 1, 1),
            material.clone(),
        ));

        let rules = AnimationRules::new().with_shader_clock(material.clone());
        Ok(
            DemoSetup::new(scene, rules, ResizeTarget::ShaderResolution(material.clone()))
                .with_pointer_target(material),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadPolicy;
    use crate::error::VitrineError;
    use crate::gfx::resources::material::ShaderSource;
    use crate::runtime::AnimationState;

    #[test]
    fn test_builtin_shader_scene() {
        let setup = ShaderDemo::new().build(&DemoConfig::default(), 1.0).unwrap();
        assert!(setup.panel.is_empty());
        assert_eq!(setup.scene.statistics().object_count, 1);
        assert_eq!(setup.scene.lights().count(), 0);

        let material = setup.scene.material_manager.shader(SCREEN).unwrap();
        assert_eq!(material.source, ShaderSource::Builtin);
        assert_eq!(material.uniforms.time, 1.0);
        assert_eq!(setup.pointer_targets, vec![SCREEN.to_string()]);
    }

    #[test]
    fn test_time_starts_at_one() {
        let setup = ShaderDemo::new().build(&DemoConfig::default(), 1.0).unwrap();
        let state = AnimationState::capture(&setup.rules, &setup.scene).unwrap();
        assert_eq!(state.time, 1.0);
        assert_eq!(state.advance(0.5, &setup.rules).time, 1.5);
    }

    #[test]
    fn test_missing_shader_file() {
        let config = DemoConfig::default().with_shader_path("/nonexistent/plasma.wgsl");
        assert!(matches!(
            ShaderDemo::new().build(&config, 1.0),
            Err(VitrineError::ResourceLoad(_))
        ));

        let lenient = config.with_load_policy(LoadPolicy::Fallback);
        let setup = ShaderDemo::new().build(&lenient, 1.0).unwrap();
        assert_eq!(
            setup.scene.material_manager.shader(SCREEN).unwrap().source,
            ShaderSource::Builtin
        );
    }

    #[test]
    fn test_custom_shader_file() {
        let path = std::env::temp_dir().join(format!("vitrine-shader-{}.wgsl", std::process::id()));
        std::fs::write(&path, "// custom").unwrap();

        let config = DemoConfig::default().with_shader_path(&path);
        let setup = ShaderDemo::new().build(&config, 1.0).unwrap();
        assert_eq!(
            setup.scene.material_manager.shader(SCREEN).unwrap().code(),
            "// custom"
        );
        let _ = std::fs::remove_file(path);
    }
}
