//! Physically shaded torus knot above a textured concrete plane, with a
//! tuning panel for the lights and the knot's material

use std::path::PathBuf;

use cgmath::Vector3;

use crate::config::{DemoConfig, LoadPolicy};
use crate::controls::{ControlPanel, Conversion, LightField, MaterialField, Property};
use crate::error::Result;
use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
use crate::gfx::color::Color;
use crate::gfx::geometry::{generate_plane, generate_torus_knot, TorusKnot};
use crate::gfx::resources::{MapKind, PhysicalMaterial, TextureImage, TextureMaps};
use crate::gfx::scene::{Light, Object, Scene, ShadowConfig};
use crate::runtime::AnimationRules;
use crate::viewport::ResizeTarget;

use super::{Demo, DemoSetup};

pub const HERO: &str = "hero";
pub const PLANE: &str = "plane";

const AMBIENT_COLOR: u32 = 0x404040;
const AMBIENT_INTENSITY: f32 = 1.0;
const POINT_COLOR: u32 = 0xffffff;
const SHADOW_INTENSITY: f32 = 0.25;
const HERO_SPIN: f32 = 0.6;
const TEXTURE_SET: &str = "Concrete_Blocks_011";

/// Initial values of the hero material and its sliders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroConfig {
    pub color: u32,
    pub roughness: f32,
    pub metalness: f32,
    pub reflectivity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            color: 0x00ff00,
            roughness: 0.5,
            metalness: 0.5,
            reflectivity: 0.5,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PhysicalDemo {
    pub hero: HeroConfig,
}

impl PhysicalDemo {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `<asset_dir>/textures/<set>_SD/<set>_<map>.<ext>`
pub fn texture_path(config: &DemoConfig, map: &str, extension: &str) -> PathBuf {
    config.asset_path(format!(
        "textures/{TEXTURE_SET}_SD/{TEXTURE_SET}_{map}.{extension}"
    ))
}

fn load_plane_maps(config: &DemoConfig) -> Result<TextureMaps> {
    let load = |map: &str, extension: &str, kind: MapKind| {
        TextureImage::load_with_policy(
            &texture_path(config, map, extension),
            kind,
            config.load_policy,
        )
    };

    Ok(TextureMaps {
        base_color: Some(load("basecolor", "jpg", MapKind::BaseColor)?),
        bump: Some(load("height", "png", MapKind::Bump)?),
        normal: Some(load("normal", "jpg", MapKind::Normal)?),
        roughness: Some(load("roughness", "jpg", MapKind::Roughness)?),
        ambient_occlusion: Some(load("ambientOcclusion", "jpg", MapKind::AmbientOcclusion)?),
    })
}

impl Demo for PhysicalDemo {
    fn title(&self) -> &str {
        "vitrine: physical"
    }

    fn build(&self, config: &DemoConfig, aspect: f32) -> Result<DemoSetup> {
        if config.load_policy == LoadPolicy::Fallback {
            log::debug!("missing textures will be replaced by placeholders");
        }
        let plane_maps = load_plane_maps(config)?;

        let camera = OrbitCamera::looking_at_origin(5.0, aspect);
        let mut scene = Scene::new(CameraManager::new(camera, CameraController::default()));

        let ambient = scene.add_light(Light::ambient(
            "ambient",
            Color::from_hex(AMBIENT_COLOR),
            AMBIENT_INTENSITY,
        ));
        let key_light = Light::point(
            "key",
            Color::from_hex(POINT_COLOR),
            SHADOW_INTENSITY,
            Vector3::new(-0.5, 0.5, 4.0),
        )
        .with_shadow(ShadowConfig {
            map_size: 512,
            near: 0.5,
            far: 500.0,
        });
        let mut fill_light = key_light.clone_as("fill");
        fill_light.intensity = 1.0 - SHADOW_INTENSITY;
        let key = scene.add_light(key_light);
        let fill = scene.add_light(fill_light);

        let hero_config = self.hero;
        scene.material_manager.add_physical(
            PhysicalMaterial::new(HERO)
                .with_color(Color::from_hex(hero_config.color))
                .with_roughness(hero_config.roughness)
                .with_metalness(hero_config.metalness)
                .with_reflectivity(hero_config.reflectivity)
                .with_clearcoat(hero_config.clearcoat, hero_config.clearcoat_roughness),
        );
        let knot = TorusKnot {
            radius: 0.75,
            tube: 0.25,
            tubular_segments: 100,
            radial_segments: 16,
            p: 2,
            q: 3,
        };
        let hero = scene.add_object(
            Object::from_geometry(HERO, &generate_torus_knot(&knot), HERO).with_cast_shadow(true),
        );

        scene.material_manager.add_physical(
            PhysicalMaterial::new(PLANE)
                .with_color(Color::from_hex(0x666666))
                .with_maps(plane_maps),
        );
        scene.add_object(
            Object::from_geometry(PLANE, &generate_plane(6.0, 6.0, 1, 1), PLANE)
                .with_position(Vector3::new(0.0, 0.0, -2.0))
                .with_receive_shadow(true),
        );

        let mut panel = ControlPanel::new("Controls");
        panel
            .add_color("Lighting/Ambient", "color", Color::from_hex(AMBIENT_COLOR))
            .bind(Property::light(ambient, LightField::Color));
        panel
            .add_slider("Lighting/Ambient", "intensity", 0.1, 10.0, AMBIENT_INTENSITY)
            .bind(Property::light(ambient, LightField::Intensity));
        panel
            .add_color("Lighting/Point", "color", Color::from_hex(POINT_COLOR))
            .bind(Property::light(key, LightField::Color))
            .bind(Property::light(fill, LightField::Color));
        panel
            .add_slider("Lighting/Point", "shadowIntensity", 0.0, 1.0, SHADOW_INTENSITY)
            .bind(Property::light(key, LightField::Intensity))
            .bind_with(Property::light(fill, LightField::Intensity), Conversion::Complement);

        panel
            .add_color("Cube/Material", "color", Color::from_hex(hero_config.color))
            .bind(Property::material(HERO, MaterialField::Color));
        let sliders = [
            ("roughness", MaterialField::Roughness, hero_config.roughness),
            ("metalness", MaterialField::Metalness, hero_config.metalness),
            ("reflectivity", MaterialField::Reflectivity, hero_config.reflectivity),
            ("clearcoat", MaterialField::Clearcoat, hero_config.clearcoat),
            (
                "clearcoatRoughness",
                MaterialField::ClearcoatRoughness,
                hero_config.clearcoat_roughness,
            ),
        ];
        for (label, field, initial) in sliders {
            panel
                .add_slider("Cube/Material", label, 0.0, 1.0, initial)
                .bind(Property::material(HERO, field));
        }

        let rules = AnimationRules::new().with_spin(hero, Vector3::new(HERO_SPIN, HERO_SPIN, 0.0));
        DemoSetup::new(scene, rules, ResizeTarget::CameraAspect).with_panel(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::ControlValue;
    use crate::error::{ResourceKind, VitrineError};

    fn config() -> DemoConfig {
        DemoConfig::default()
            .with_asset_dir("/nonexistent/vitrine-assets")
            .with_load_policy(LoadPolicy::Fallback)
    }

    fn build() -> DemoSetup {
        PhysicalDemo::new().build(&config(), 1.5).unwrap()
    }

    #[test]
    fn test_missing_textures_fail_fast() {
        let config = config().with_load_policy(LoadPolicy::FailFast);
        match PhysicalDemo::new().build(&config, 1.5) {
            Err(VitrineError::ResourceLoad(err)) => {
                assert_eq!(err.kind, ResourceKind::Texture);
                assert!(err.path.ends_with("Concrete_Blocks_011_basecolor.jpg"));
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("missing textures should fail"),
        }
    }

    #[test]
    fn test_texture_paths() {
        let config = DemoConfig::default();
        assert_eq!(
            texture_path(&config, "height", "png"),
            PathBuf::from("assets")
                .join("textures/Concrete_Blocks_011_SD/Concrete_Blocks_011_height.png")
        );
    }

    #[test]
    fn test_scene_contents() {
        let setup = build();
        let scene = &setup.scene;
        let stats = scene.statistics();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.light_count, 3);

        let key = scene.light(scene.find_light("key").unwrap()).unwrap();
        let fill = scene.light(scene.find_light("fill").unwrap()).unwrap();
        assert_eq!(key.intensity, 0.25);
        assert_eq!(fill.intensity, 0.75);
        assert!(key.shadow().is_some());
        assert!(fill.shadow().is_none());
        assert_eq!(fill.position(), key.position());

        let plane = scene.object(scene.find_object(PLANE).unwrap()).unwrap();
        assert_eq!(plane.transform.position.z, -2.0);
        assert!(plane.receive_shadow);
        let hero = scene.object(scene.find_object(HERO).unwrap()).unwrap();
        assert!(hero.cast_shadow);

        let material = scene.material_manager.physical(HERO).unwrap();
        assert_eq!(material.color.to_hex(), 0x00ff00);
        assert_eq!(material.metalness, 0.5);
        assert_eq!(
            scene.material_manager.physical(PLANE).unwrap().maps.flags(),
            0b11111
        );
    }

    #[test]
    fn test_panel_layout() {
        let setup = build();
        let keys: Vec<_> = setup.panel.controls().iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec![
                "Lighting/Ambient/color",
                "Lighting/Ambient/intensity",
                "Lighting/Point/color",
                "Lighting/Point/shadowIntensity",
                "Cube/Material/color",
                "Cube/Material/roughness",
                "Cube/Material/metalness",
                "Cube/Material/reflectivity",
                "Cube/Material/clearcoat",
                "Cube/Material/clearcoatRoughness",
            ]
        );
    }

    #[test]
    fn test_point_color_drives_both_lights() {
        let mut setup = build();
        setup
            .panel
            .set(
                "Lighting/Point/color",
                ControlValue::Color(Color::from_hex(0xff8800)),
            )
            .unwrap();
        for edit in setup.panel.drain_edits() {
            edit.apply(&mut setup.scene).unwrap();
        }
        for name in ["key", "fill"] {
            let light = setup
                .scene
                .light(setup.scene.find_light(name).unwrap())
                .unwrap();
            assert_eq!(light.color.to_hex(), 0xff8800);
        }
    }

    #[test]
    fn test_shadow_intensity_sums_to_one() {
        let mut setup = build();
        for v in [0.0, 0.1, 0.5, 0.9, 1.0] {
            setup
                .panel
                .set("Lighting/Point/shadowIntensity", ControlValue::Scalar(v))
                .unwrap();
            for edit in setup.panel.drain_edits() {
                edit.apply(&mut setup.scene).unwrap();
            }
            let total: f32 = setup
                .scene
                .lights()
                .filter(|l| l.name != "ambient")
                .map(|l| l.intensity)
                .sum();
            assert!((total - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_hero_spins() {
        let setup = build();
        assert_eq!(setup.rules.spins.len(), 1);
        assert_eq!(setup.rules.spins[0].rate, Vector3::new(0.6, 0.6, 0.0));
    }
}
